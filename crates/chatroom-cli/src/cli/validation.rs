//! Input rules applied before anything reaches the stores.

use thiserror::Error;

pub const MAX_TITLE_CHARS: usize = 50;
pub const MAX_MESSAGE_CHARS: usize = 1000;
pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 15;
pub const OTP_DIGITS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Title must not exceed 50 characters")]
    TitleTooLong,
    #[error("Message cannot be empty")]
    MessageEmpty,
    #[error("Message too long")]
    MessageTooLong,
    #[error("Country code is required")]
    CountryCodeRequired,
    #[error("Phone number must be between 10 and 15 digits")]
    PhoneLength,
    #[error("Phone number must contain only digits")]
    PhoneNotDigits,
    #[error("OTP must be 6 digits")]
    Otp,
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::TitleRequired);
    }
    if len > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

pub fn validate_message(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::MessageEmpty);
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ValidationError::MessageTooLong);
    }
    Ok(())
}

pub fn validate_phone(country_code: &str, phone_number: &str) -> Result<(), ValidationError> {
    if country_code.trim().is_empty() {
        return Err(ValidationError::CountryCodeRequired);
    }
    let len = phone_number.chars().count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&len) {
        return Err(ValidationError::PhoneLength);
    }
    if !all_digits(phone_number) {
        return Err(ValidationError::PhoneNotDigits);
    }
    Ok(())
}

pub fn validate_otp(otp: &str) -> Result<(), ValidationError> {
    if otp.chars().count() == OTP_DIGITS && all_digits(otp) {
        Ok(())
    } else {
        Err(ValidationError::Otp)
    }
}
