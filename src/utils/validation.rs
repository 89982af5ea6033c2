//! Utilidades de validación
//!
//! Validaciones que no pueden expresarse con los atributos de `validator`:
//! formato del NIT y las políticas de fechas de asignaciones y etapas.

use chrono::{Duration, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

use crate::utils::errors::{field_error, AppError, GENERAL_NOTICE};

/// Duración mínima de la práctica (3 meses), inclusiva
pub const MIN_PRACTICE_DAYS: i64 = 90;
/// Duración máxima de la práctica (12 meses), inclusiva
pub const MAX_PRACTICE_DAYS: i64 = 365;
/// Antelación máxima con la que puede proponerse una fecha de inicio
pub const MAX_START_LEAD_DAYS: i64 = 365;

lazy_static! {
    static ref NIT_CHARS: Regex = Regex::new(r"^[0-9][0-9.\- ]*$").unwrap();
    static ref PHONE_CHARS: Regex = Regex::new(r"^\+?[0-9][0-9 ()\-]*$").unwrap();
}

/// Validar NIT: dígitos con separadores opcionales, al menos 8 dígitos
pub fn validate_nit(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if !NIT_CHARS.is_match(value) {
        return Err(field_error(
            "nit_format",
            "El NIT sólo puede contener dígitos, puntos y guiones.",
        ));
    }
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if digits < 8 {
        return Err(field_error("nit_length", "El NIT debe tener al menos 8 dígitos."));
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if !PHONE_CHARS.is_match(value.trim()) {
        return Err(field_error("phone", "Número de teléfono inválido."));
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("required", "Este campo es obligatorio."));
    }
    Ok(())
}

/// Reglas de fechas de una asignación propuesta, evaluadas respecto a `today`.
///
/// Sólo se comprueban al crear o editar; una asignación existente no se
/// invalida con el paso del tiempo.
pub fn check_proposal_dates(
    errors: &mut ValidationErrors,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) {
    if start < today {
        errors.add(
            "proposed_start_date",
            field_error("past_date", "La fecha de inicio no puede ser anterior a hoy."),
        );
    } else if start > today + Duration::days(MAX_START_LEAD_DAYS) {
        errors.add(
            "proposed_start_date",
            field_error(
                "too_far",
                "La fecha de inicio no puede estar a más de un año de hoy.",
            ),
        );
    }

    if end <= start {
        errors.add(
            "proposed_end_date",
            field_error(
                "end_before_start",
                "La fecha de finalización debe ser posterior a la fecha de inicio.",
            ),
        );
        return;
    }

    let days = (end - start).num_days();
    if days < MIN_PRACTICE_DAYS {
        errors.add(
            "proposed_end_date",
            field_error(
                "too_short",
                format!("La práctica debe durar al menos {} días (3 meses).", MIN_PRACTICE_DAYS),
            ),
        );
    } else if days > MAX_PRACTICE_DAYS {
        errors.add(
            "proposed_end_date",
            field_error(
                "too_long",
                format!(
                    "La práctica no puede durar más de {} días (12 meses).",
                    MAX_PRACTICE_DAYS
                ),
            ),
        );
    }
}

/// La fecha de fin de una etapa es opcional, pero si existe va después del inicio
pub fn check_placement_dates(
    errors: &mut ValidationErrors,
    start: NaiveDate,
    end: Option<NaiveDate>,
) {
    if let Some(end) = end {
        if end <= start {
            errors.add(
                GENERAL_NOTICE,
                field_error(
                    "end_before_start",
                    "La fecha de finalización debe ser posterior a la fecha de inicio.",
                ),
            );
        }
    }
}

/// Resultado de `Validate::validate` como colección mutable de errores
pub fn collect(result: Result<(), ValidationErrors>) -> ValidationErrors {
    result.err().unwrap_or_else(ValidationErrors::new)
}

/// Convertir la colección en error de aplicación si no está vacía
pub fn into_result(errors: ValidationErrors) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
