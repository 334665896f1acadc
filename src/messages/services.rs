use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use super::dto::MessagePayload;
use super::locale::to_upper_tr;
use crate::{
    error::ApiError,
    mail::{Mailer, OutgoingMail},
    teachers::{services::find_teacher, Teacher, TeacherRepo},
};

lazy_static! {
    static ref CLASS_RE: Regex =
        Regex::new(r"^(?:[1-9]|1[0-2])(?:[\s-])?[A-Za-zÇĞİÖŞÜçğıöşü]$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^05\d{9}$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageRejection {
    #[error("Zorunlu alanlar eksik.")]
    MissingFields,
    #[error("Sınıf formatı hatalı. Örn: 10-A")]
    ClassFormat,
    #[error("Telefon 05 ile başlamalı ve 11 haneli olmalı.")]
    PhoneFormat,
}

impl From<MessageRejection> for ApiError {
    fn from(r: MessageRejection) -> Self {
        ApiError::Validation(r.to_string())
    }
}

/// A submission that passed every field rule. Optional fields are empty strings when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMessage {
    pub teacher_id: String,
    pub student_name: String,
    pub student_class: String,
    pub student_phone: String,
    pub message: String,
}

pub fn is_valid_class(class: &str) -> bool {
    CLASS_RE.is_match(class)
}

/// Keeps only the ASCII digits of `raw`.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn is_valid_phone(digits: &str) -> bool {
    PHONE_RE.is_match(digits)
}

pub fn validate(payload: MessagePayload) -> Result<ValidMessage, MessageRejection> {
    let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string()).unwrap_or_default();

    let teacher_id = trimmed(payload.teacher_id);
    let student_name = to_upper_tr(&trimmed(payload.student_name));
    let student_class = to_upper_tr(&trimmed(payload.student_class));
    let student_phone = normalize_phone(&trimmed(payload.student_phone));
    let message = trimmed(payload.message);

    if teacher_id.is_empty() || student_name.is_empty() || message.is_empty() {
        return Err(MessageRejection::MissingFields);
    }
    if !student_class.is_empty() && !is_valid_class(&student_class) {
        return Err(MessageRejection::ClassFormat);
    }
    if !student_phone.is_empty() && !is_valid_phone(&student_phone) {
        return Err(MessageRejection::PhoneFormat);
    }

    Ok(ValidMessage {
        teacher_id,
        student_name,
        student_class,
        student_phone,
        message,
    })
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

pub fn compose(teacher: &Teacher, msg: &ValidMessage) -> OutgoingMail {
    let subject = format!("Mesaj - {} {}", teacher.name, teacher.surname);
    let body = [
        format!("Öğretmen: {} {}", teacher.name, teacher.surname),
        format!("Öğretmen e-posta: {}", teacher.email),
        String::new(),
        format!("Öğrenci ad soyad: {}", msg.student_name),
        format!("Sınıf: {}", or_dash(&msg.student_class)),
        format!("Telefon: {}", or_dash(&msg.student_phone)),
        String::new(),
        "Mesaj:".to_string(),
        msg.message.clone(),
    ]
    .join("\n");

    OutgoingMail {
        to: teacher.email.clone(),
        subject,
        body,
    }
}

/// Validates, resolves the teacher and sends exactly one email. Nothing is stored.
pub async fn relay(
    teachers: &dyn TeacherRepo,
    mailer: &dyn Mailer,
    payload: MessagePayload,
) -> Result<(), ApiError> {
    let msg = validate(payload).inspect_err(|r| warn!(reason = %r, "message rejected"))?;

    let teacher = find_teacher(teachers, &msg.teacher_id)
        .await
        .inspect_err(|e| warn!(teacher_id = %msg.teacher_id, error = %e, "teacher lookup failed"))?;

    mailer.send(compose(&teacher, &msg)).await?;
    info!(teacher_id = %teacher.id, "message relayed");
    Ok(())
}
