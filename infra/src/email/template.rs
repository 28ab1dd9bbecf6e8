//! OTP email content

use fa_core::domain::entities::otp::OtpPurpose;

/// Subject line for an OTP email
pub fn subject(purpose: OtpPurpose) -> &'static str {
    match purpose {
        OtpPurpose::Registration | OtpPurpose::EmailVerification => {
            "Verification code for FormAI"
        }
        OtpPurpose::PasswordReset => "Reset your FormAI password",
    }
}

/// HTML body carrying the code and its validity window
pub fn html_body(code: &str, valid_minutes: i64) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px; border: 1px solid #ccc; border-radius: 5px;">
  <h2>Your OTP Code</h2>
  <p style="font-size: 32px;">Your OTP code is <strong>{code}</strong>.</p>
  <p style="font-size: 14px;">It is valid for {valid_minutes} minutes.</p>
  <p style="color: #888;">Thank you for using our service!</p>
</div>"#
    )
}
