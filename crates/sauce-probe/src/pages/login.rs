//! Login screen

use crate::config::Credentials;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use crate::wait::WaitState;

/// Shown after submitting a password no account accepts
pub const INVALID_CREDENTIALS_MESSAGE: &str =
    "Epic sadface: Username and password do not match any user in this service";

/// Shown after submitting the locked-out account's credentials
pub const LOCKED_OUT_MESSAGE: &str = "Epic sadface: Sorry, this user has been locked out.";

/// Elements of the login screen
#[derive(Debug, Clone)]
pub struct LoginElements {
    /// Username input
    pub user_name_input: Locator,
    /// Password input
    pub password_input: Locator,
    /// Submit button
    pub login_button: Locator,
    /// Error banner
    pub error_text: Locator,
}

impl Default for LoginElements {
    fn default() -> Self {
        Self {
            user_name_input: Locator::css("#user-name"),
            password_input: Locator::css("#password"),
            login_button: Locator::css("#login-button"),
            error_text: Locator::test_id("error"),
        }
    }
}

/// The login screen
#[derive(Debug)]
pub struct LoginPage<'s> {
    session: &'s Session,
    /// Locators
    pub elements: LoginElements,
}

impl<'s> LoginPage<'s> {
    /// Create the page object
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            elements: LoginElements::default(),
        }
    }

    /// Open the login screen and wait for the form
    ///
    /// # Errors
    ///
    /// Returns navigation errors or a timeout if the form never appears.
    pub async fn navigate(&self) -> E2eResult<()> {
        self.session
            .step("Navigate to login page", async {
                self.session.goto(&self.url()).await?;
                self.session
                    .wait_for(&self.elements.user_name_input, WaitState::Attached)
                    .await
            })
            .await
    }

    /// Type the username
    ///
    /// # Errors
    ///
    /// Returns a timeout if the input never becomes usable.
    pub async fn fill_user_name(&self, username: &str) -> E2eResult<()> {
        self.session
            .step("Fill username", async {
                let input = &self.elements.user_name_input;
                self.session.wait_for(input, WaitState::Visible).await?;
                self.session.fill(input, username).await
            })
            .await
    }

    /// Type the password
    ///
    /// # Errors
    ///
    /// Returns a timeout if the input never becomes usable.
    pub async fn fill_password(&self, password: &str) -> E2eResult<()> {
        self.session
            .step("Fill password", async {
                let input = &self.elements.password_input;
                self.session.wait_for(input, WaitState::Visible).await?;
                self.session.fill(input, password).await
            })
            .await
    }

    /// Submit the form
    ///
    /// # Errors
    ///
    /// Returns a timeout if the button never becomes usable.
    pub async fn click_login_button(&self) -> E2eResult<()> {
        self.session
            .step("Click login button", async {
                let button = &self.elements.login_button;
                self.session.wait_for(button, WaitState::Visible).await?;
                self.session.click(button).await
            })
            .await
    }

    /// Open the screen, type `credentials` and submit
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error.
    pub async fn login(&self, credentials: &Credentials) -> E2eResult<()> {
        self.session
            .step(&format!("Login as {}", credentials.username), async {
                self.navigate().await?;
                self.fill_user_name(&credentials.username).await?;
                self.fill_password(&credentials.password).await?;
                self.click_login_button().await
            })
            .await
    }

    /// Assert the error banner contains `expected`
    ///
    /// # Errors
    ///
    /// Returns a timeout if no banner appears, or a mismatch with its text.
    pub async fn check_error_message(&self, expected: &str) -> E2eResult<()> {
        self.session
            .step("Check error message", async {
                let banner = &self.elements.error_text;
                self.session.wait_for(banner, WaitState::Visible).await?;
                self.session.expect(banner).to_contain_text(expected).await
            })
            .await
    }

    /// Assert the wrong-password banner is shown
    ///
    /// # Errors
    ///
    /// See [`LoginPage::check_error_message`].
    pub async fn check_invalid_credentials_error(&self) -> E2eResult<()> {
        self.check_error_message(INVALID_CREDENTIALS_MESSAGE).await
    }

    /// Assert the locked-out banner is shown
    ///
    /// # Errors
    ///
    /// See [`LoginPage::check_error_message`].
    pub async fn check_locked_out_error(&self) -> E2eResult<()> {
        self.check_error_message(LOCKED_OUT_MESSAGE).await
    }
}

impl PageObject for LoginPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn url(&self) -> String {
        self.session.urls().login()
    }

    fn page_name(&self) -> &'static str {
        "login"
    }
}
