use crate::state::entities::EntityList;
use crate::state::messages::{PlayerAction, TeamAction};
use cricket_api::{Player, Team};

/// Teams of the open match.
#[derive(Debug, Default)]
pub struct TeamSlice(pub EntityList<Team>);

impl TeamSlice {
    pub fn reduce(&mut self, action: TeamAction) {
        match action {
            TeamAction::FetchTeamsRequest(match_id) => self.0.request(match_id),
            TeamAction::FetchTeamsSuccess(teams) => self.0.success(teams),
            TeamAction::FetchTeamsFailure(e) => self.0.failure(e),
        }
    }

    pub fn teams(&self) -> &[Team] {
        &self.0.items
    }
}

/// Players of the selected team.
#[derive(Debug, Default)]
pub struct PlayerSlice(pub EntityList<Player>);

impl PlayerSlice {
    pub fn reduce(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::FetchPlayersRequest(team_id) => self.0.request(team_id),
            PlayerAction::FetchPlayersSuccess(players) => self.0.success(players),
            PlayerAction::FetchPlayersFailure(e) => self.0.failure(e),
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.0.items
    }
}
