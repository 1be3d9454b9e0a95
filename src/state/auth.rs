use crate::state::messages::AuthAction;
use cricket_api::User;

#[derive(Debug, Default)]
pub struct AuthSlice {
    pub user: Option<User>,
    pub authenticated: bool,
    /// True while the state only comes from the local mirror.
    pub from_hint: bool,
    pub login_url: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthSlice {
    pub fn reduce(&mut self, action: AuthAction) {
        use AuthAction::*;
        match action {
            RestoreSession { authenticated, user } => {
                self.authenticated = authenticated && user.is_some();
                self.user = user.filter(|_| authenticated);
                self.from_hint = true;
            }
            CheckAuthStatusRequest | FetchCurrentUserRequest | LogoutRequest => {
                self.loading = true;
                self.error = None;
            }
            LoginRequest => {
                self.error = None;
            }
            LoginRedirect(url) => {
                self.login_url = Some(url);
            }
            CheckAuthStatusSuccess(status) => {
                self.loading = false;
                self.from_hint = false;
                self.authenticated = status.authenticated;
                self.user = status.user.filter(|_| status.authenticated);
                if self.authenticated {
                    self.login_url = None;
                }
            }
            FetchCurrentUserSuccess(user) => {
                self.loading = false;
                self.from_hint = false;
                self.authenticated = true;
                self.user = Some(user);
                self.login_url = None;
            }
            LogoutSuccess => {
                *self = Self::default();
            }
            CheckAuthStatusFailure(e) | FetchCurrentUserFailure(e) => {
                self.loading = false;
                self.from_hint = false;
                self.authenticated = false;
                self.user = None;
                self.error = Some(e);
            }
            LogoutFailure(e) => {
                self.loading = false;
                self.error = Some(e);
            }
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().filter(|_| self.authenticated).map(|u| u.id.as_str())
    }
}
