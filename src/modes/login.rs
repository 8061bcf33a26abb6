use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which login field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

/// What a key press on the login screen asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginEvent {
    /// Credentials are ready to hand to the auth service
    Submitted,
    /// Skip the account and play as guest
    GuestRequested,
    Quit,
    None,
}

/// Editable state of the login screen
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: LoginField::Username,
            error: None,
        }
    }

    /// Clear the password and error after a failed attempt, keeping the
    /// username for another try
    pub fn reject(&mut self, reason: String) {
        self.password.clear();
        self.focus = LoginField::Password;
        self.error = Some(reason);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LoginEvent {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => LoginEvent::Quit,
                KeyCode::Char('g') => LoginEvent::GuestRequested,
                _ => LoginEvent::None,
            };
        }

        match key.code {
            KeyCode::Esc => LoginEvent::Quit,
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.focus = match self.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
                LoginEvent::None
            }
            KeyCode::Enter => match self.focus {
                // Enter on the username field just moves on to the password.
                LoginField::Username => {
                    self.focus = LoginField::Password;
                    LoginEvent::None
                }
                LoginField::Password => LoginEvent::Submitted,
            },
            KeyCode::Backspace => {
                match self.focus {
                    LoginField::Username => self.username.pop(),
                    LoginField::Password => self.password.pop(),
                };
                LoginEvent::None
            }
            KeyCode::Char(c) => {
                self.error = None;
                match self.focus {
                    LoginField::Username => self.username.push(c),
                    LoginField::Password => self.password.push(c),
                }
                LoginEvent::None
            }
            _ => LoginEvent::None,
        }
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut LoginForm, text: &str) {
        for c in text.chars() {
            form.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_fills_the_focused_field() {
        let mut form = LoginForm::new();
        type_str(&mut form, "alice");
        assert_eq!(form.username, "alice");
        assert!(form.password.is_empty());

        form.handle_key(press(KeyCode::Tab));
        type_str(&mut form, "abc");
        assert_eq!(form.password, "abc");
    }

    #[test]
    fn enter_moves_focus_then_submits() {
        let mut form = LoginForm::new();
        type_str(&mut form, "alice");

        assert_eq!(form.handle_key(press(KeyCode::Enter)), LoginEvent::None);
        assert_eq!(form.focus, LoginField::Password);

        type_str(&mut form, "abc");
        assert_eq!(form.handle_key(press(KeyCode::Enter)), LoginEvent::Submitted);
    }

    #[test]
    fn backspace_edits_the_focused_field() {
        let mut form = LoginForm::new();
        type_str(&mut form, "alicex");
        form.handle_key(press(KeyCode::Backspace));
        assert_eq!(form.username, "alice");
    }

    #[test]
    fn guest_shortcut_and_quit() {
        let mut form = LoginForm::new();
        let ctrl_g = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert_eq!(form.handle_key(ctrl_g), LoginEvent::GuestRequested);
        assert_eq!(form.handle_key(press(KeyCode::Esc)), LoginEvent::Quit);
    }

    #[test]
    fn rejection_keeps_username_and_clears_password() {
        let mut form = LoginForm::new();
        type_str(&mut form, "alice");
        form.handle_key(press(KeyCode::Enter));
        type_str(&mut form, "bad");

        form.reject("Incorrect password".to_string());
        assert_eq!(form.username, "alice");
        assert!(form.password.is_empty());
        assert_eq!(form.error.as_deref(), Some("Incorrect password"));

        // Typing again clears the error.
        form.handle_key(press(KeyCode::Char('a')));
        assert!(form.error.is_none());
    }
}
