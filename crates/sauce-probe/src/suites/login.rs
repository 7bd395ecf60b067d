//! "Login": rejected sign-ins

use crate::config::Environment;
use crate::fixture::Fixture;
use crate::harness::{Scenario, Suite, Tag};
use crate::page_object::PageObject;
use crate::result::E2eResult;
use futures::future::BoxFuture;
use futures::FutureExt;

/// The suite
#[must_use]
pub fn suite() -> Suite {
    Suite::new("Login")
        .with_scenario(Scenario::new(
            "Login with invalid password",
            &[Tag::Login],
            invalid_password,
        ))
        .with_scenario(Scenario::new(
            "Login as locked out user",
            &[Tag::Login],
            locked_out_user,
        ))
}

fn invalid_password<'a>(fx: &'a Fixture<'a>, env: &'a Environment) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        fx.login.login(&env.invalid_password_user()).await?;
        fx.login.check_invalid_credentials_error().await?;
        fx.login.check_url(&fx.login.url()).await
    }
    .boxed()
}

fn locked_out_user<'a>(fx: &'a Fixture<'a>, env: &'a Environment) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        fx.login.login(&env.locked_out_user()).await?;
        fx.login.check_locked_out_error().await?;
        fx.login.check_url(&fx.login.url()).await
    }
    .boxed()
}
