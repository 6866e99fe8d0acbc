use dotenv::dotenv;
use pinboard::auth::{SessionState, VerifyOtpRequest};
use pinboard::forms::SignUpForm;
use pinboard::Pinboard;
use std::env;
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();
    pretty_env_logger::init();

    let pinboard = Pinboard::from_env()?;
    pinboard.set_session_state(SessionState::SignedOut);
    println!("Starting Auth example against {}", pinboard.config.api_url);
    println!("Opening at {:?}", pinboard.current_route());

    let email = env::var("PINBOARD_DEMO_EMAIL").unwrap_or_else(|_| "demo.user@gmail.com".to_string());
    let password = env::var("PINBOARD_DEMO_PASSWORD").unwrap_or_else(|_| "Secret1!".to_string());

    let form = SignUpForm {
        email: email.clone(),
        username: "demo_user".to_string(),
        first_name: "Demo".to_string(),
        last_name: "User".to_string(),
        password: password.clone(),
        confirm_password: password.clone(),
    };

    let errors = form.check();
    if !errors.is_empty() {
        println!("Sign up form is invalid: {:?}", errors);
        return Ok(());
    }

    // Step 1: request an OTP for the new account
    let registration = form.to_request();
    println!("Requesting an OTP for {}", email);
    let sent = pinboard.auth().send_register_otp(&registration).await?;
    println!("Register response: {:?}", sent);

    print!("Enter the OTP from your email: ");
    io::stdout().flush()?;
    let mut otp = String::new();
    io::stdin().lock().read_line(&mut otp)?;

    // Step 2: verify it
    let request = VerifyOtpRequest::from_registration(&registration, &otp);
    match pinboard.auth().verify_register_otp(&request).await {
        Ok(verified) => println!("Verified: {:?}", verified.user),
        Err(err) => {
            println!("Verification failed: {}", err);
            return Ok(());
        }
    }

    // Sign in through the screen so the session is updated
    let mut sign_in = pinboard.sign_in_screen();
    sign_in.form.email = email;
    sign_in.form.password = password;
    match sign_in.submit().await {
        Ok(route) => println!("\nSigned in, navigating to {}", route.path()),
        Err(err) => println!("\nSign in failed: {:?}", err),
    }

    let mut profile = pinboard.profile_screen(sign_in.user().cloned());
    println!("Profile: {} {:?}", profile.display_name(), profile.handle());

    println!("\nSigning out");
    match profile.sign_out().await {
        Ok(route) => println!("Signed out, back to {}", route.path()),
        Err(alert) => println!("{}", alert),
    }

    println!("Auth example completed");

    Ok(())
}
