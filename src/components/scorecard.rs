use cricket_api::{InningsStatus, InningsSummary, OverSummary, ScorecardResponse};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget};

pub const READY_TO_START: &str = "Match ready to start";

/// One-line score for a team: runs/wickets and overs of the innings it batted.
pub fn team_summary(card: &ScorecardResponse, team: &str) -> String {
    let Some(innings) = card.innings.as_deref() else {
        return READY_TO_START.to_string();
    };
    match innings.iter().find(|i| i.batting_team == team) {
        Some(i) => format!("{}/{} ({:.1} ov)", i.total_runs, i.total_wickets, i.total_overs),
        None => "Yet to bat".to_string(),
    }
}

pub fn over_strip(over: &OverSummary) -> String {
    let balls: Vec<String> = over.balls.iter().map(|b| b.short_label()).collect();
    format!("Over {:>2}: {}  ({} runs)", over.over_number, balls.join(" "), over.total_runs)
}

fn innings_header(innings: &InningsSummary) -> Line<'static> {
    let status = match innings.status {
        InningsStatus::InProgress => Span::styled("batting", Style::default().fg(Color::Green)),
        InningsStatus::Completed => Span::styled("completed", Style::default().fg(Color::DarkGray)),
    };
    Line::from(vec![
        Span::styled(
            format!("Innings {}: {} ", innings.innings_number, innings.batting_team),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "{}/{} ({:.1} ov)  ",
            innings.total_runs, innings.total_wickets, innings.total_overs
        )),
        status,
    ])
}

fn extras_line(innings: &InningsSummary) -> Line<'static> {
    let e = &innings.extras;
    Line::styled(
        format!(
            "  Extras {} (b {}, lb {}, w {}, nb {})",
            e.total, e.byes, e.leg_byes, e.wides, e.no_balls
        ),
        Style::default().fg(Color::Gray),
    )
}

/// All lines of a scorecard, newest over last.
pub fn scorecard_lines(card: &ScorecardResponse) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let title = match (card.series_name.as_deref(), card.match_number) {
        (Some(series), Some(n)) => format!("{series}, match {n}"),
        (Some(series), None) => series.to_string(),
        (None, Some(n)) => format!("Match {n}"),
        (None, None) => "Match".to_string(),
    };
    lines.push(Line::styled(title, Style::default().fg(Color::Yellow)));
    lines.push(Line::from(format!("{:<20} {}", card.team_a, team_summary(card, &card.team_a))));
    lines.push(Line::from(format!("{:<20} {}", card.team_b, team_summary(card, &card.team_b))));
    lines.push(Line::from(""));

    for innings in card.innings.as_deref().unwrap_or_default() {
        lines.push(innings_header(innings));
        lines.push(extras_line(innings));
        if innings.overs.is_empty() {
            lines.push(Line::styled("  No balls yet", Style::default().fg(Color::DarkGray)));
        }
        for over in &innings.overs {
            lines.push(Line::from(format!("  {}", over_strip(over))));
        }
        lines.push(Line::from(""));
    }
    lines
}

pub struct ScorecardView<'a> {
    pub card: &'a ScorecardResponse,
    pub scroll: u16,
}

impl Widget for ScorecardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        Paragraph::new(scorecard_lines(self.card))
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_api::{BallSummary, BallType};

    fn card(innings: Option<Vec<InningsSummary>>) -> ScorecardResponse {
        ScorecardResponse {
            match_id: "m1".into(),
            series_id: "s1".into(),
            team_a: "Lions".into(),
            team_b: "Tigers".into(),
            total_overs: 20,
            innings,
            ..Default::default()
        }
    }

    #[test]
    fn null_innings_reads_ready_to_start_for_both_teams() {
        let card = card(None);
        assert_eq!(team_summary(&card, "Lions"), READY_TO_START);
        assert_eq!(team_summary(&card, "Tigers"), READY_TO_START);
        let text: Vec<String> = scorecard_lines(&card).iter().map(|l| l.to_string()).collect();
        assert_eq!(text.iter().filter(|l| l.contains(READY_TO_START)).count(), 2);
    }

    #[test]
    fn summary_uses_innings_batted() {
        let card = card(Some(vec![InningsSummary {
            innings_number: 1,
            batting_team: "Tigers".into(),
            total_runs: 57,
            total_wickets: 2,
            total_overs: 8.3,
            ..Default::default()
        }]));
        assert_eq!(team_summary(&card, "Tigers"), "57/2 (8.3 ov)");
        assert_eq!(team_summary(&card, "Lions"), "Yet to bat");
    }

    #[test]
    fn over_strip_labels_each_ball() {
        let over = OverSummary {
            over_number: 3,
            total_runs: 6,
            balls: vec![
                BallSummary { ball_number: 1, run_type: "4".into(), runs: 4, ..Default::default() },
                BallSummary { ball_number: 2, ball_type: BallType::Wide, run_type: "WD".into(), runs: 1, ..Default::default() },
                BallSummary { ball_number: 3, run_type: "WC".into(), is_wicket: true, ..Default::default() },
                BallSummary { ball_number: 4, run_type: "LB".into(), runs: 1, ..Default::default() },
            ],
            ..Default::default()
        };
        assert_eq!(over_strip(&over), "Over  3: 4 Wd W 1lb  (6 runs)");
    }
}
