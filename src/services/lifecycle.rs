//! Ciclo de vida de las asignaciones
//!
//! Tabla de transiciones centralizada. Todas las funciones son puras:
//! reciben la asignación actual y devuelven la nueva versión (o el motivo
//! de rechazo) sin tocar la base de datos. Los controladores se encargan
//! de persistir el resultado.
//!
//! | Desde                               | Evento          | Hacia     |
//! |-------------------------------------|-----------------|-----------|
//! | ASSIGNED                            | confirm         | CONFIRMED |
//! | PENDING, ASSIGNED                   | reject          | REJECTED  |
//! | CONFIRMED                           | start practice  | STARTED   |
//! | PENDING, ASSIGNED, CONFIRMED, REJECTED | cancel       | CANCELED  |
//! | PENDING, ASSIGNED                   | edit            | (igual)   |

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Assignment, AssignmentStatus, Placement, PlacementStatus};

/// Eventos que pueden aplicarse sobre una asignación existente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentEvent {
    Confirm,
    Reject,
    Cancel,
    StartPractice,
    Edit,
}

impl AssignmentEvent {
    pub const ALL: [AssignmentEvent; 5] = [
        AssignmentEvent::Confirm,
        AssignmentEvent::Reject,
        AssignmentEvent::Cancel,
        AssignmentEvent::StartPractice,
        AssignmentEvent::Edit,
    ];

    fn denied_action(self) -> &'static str {
        match self {
            AssignmentEvent::Confirm => "confirmarse",
            AssignmentEvent::Reject => "rechazarse",
            AssignmentEvent::Cancel => "cancelarse",
            AssignmentEvent::StartPractice => "iniciar la etapa de práctica",
            AssignmentEvent::Edit => "modificarse",
        }
    }
}

/// Motivo por el que una operación sobre la asignación no se aplica
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("La asignación no puede {}: está en estado {from}", .event.denied_action())]
    NotAllowed {
        event: AssignmentEvent,
        from: AssignmentStatus,
    },

    #[error("Debe indicar el motivo del rechazo")]
    ReasonRequired,
}

/// Estado resultante de aplicar `event` desde `from`
pub fn transition(
    from: AssignmentStatus,
    event: AssignmentEvent,
) -> Result<AssignmentStatus, Denial> {
    use AssignmentEvent as E;
    use AssignmentStatus as S;

    match (from, event) {
        (S::Assigned, E::Confirm) => Ok(S::Confirmed),
        (S::Pending | S::Assigned, E::Reject) => Ok(S::Rejected),
        (S::Confirmed, E::StartPractice) => Ok(S::Started),
        (S::Pending | S::Assigned | S::Confirmed | S::Rejected, E::Cancel) => Ok(S::Canceled),
        (S::Pending | S::Assigned, E::Edit) => Ok(from),
        _ => Err(Denial::NotAllowed { event, from }),
    }
}

/// Eventos disponibles para una asignación en el estado dado
pub fn allowed_events(from: AssignmentStatus) -> Vec<AssignmentEvent> {
    AssignmentEvent::ALL
        .into_iter()
        .filter(|event| transition(from, *event).is_ok())
        .collect()
}

/// La edición sólo procede mientras la asignación no ha sido resuelta
pub fn ensure_editable(assignment: &Assignment) -> Result<(), Denial> {
    transition(assignment.status, AssignmentEvent::Edit).map(|_| ())
}

/// ASSIGNED → CONFIRMED, registrando la fecha de confirmación
pub fn confirm(
    assignment: &Assignment,
    note: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Assignment, Denial> {
    let status = transition(assignment.status, AssignmentEvent::Confirm)?;

    let mut next = assignment.clone();
    next.status = status;
    next.confirmed_at = Some(now);
    next.updated_at = now;
    if let Some(note) = non_blank(note) {
        next.notes = append_note(&next.notes, "Confirmación", note, now);
    }
    Ok(next)
}

/// PENDING/ASSIGNED → REJECTED; el motivo es obligatorio y queda en las observaciones
pub fn reject(
    assignment: &Assignment,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Assignment, Denial> {
    let status = transition(assignment.status, AssignmentEvent::Reject)?;
    let reason = non_blank(reason).ok_or(Denial::ReasonRequired)?;

    let mut next = assignment.clone();
    next.status = status;
    next.updated_at = now;
    next.notes = append_note(&next.notes, "Rechazo", reason, now);
    Ok(next)
}

/// Cualquier estado salvo STARTED/CANCELED → CANCELED
pub fn cancel(
    assignment: &Assignment,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Assignment, Denial> {
    let status = transition(assignment.status, AssignmentEvent::Cancel)?;

    let mut next = assignment.clone();
    next.status = status;
    next.updated_at = now;
    if let Some(reason) = non_blank(reason) {
        next.notes = append_note(&next.notes, "Cancelación", reason, now);
    }
    Ok(next)
}

/// CONFIRMED → STARTED, derivando la etapa productiva.
///
/// Ambos registros deben persistirse juntos (ver
/// `AssignmentRepository::start_practice`).
pub fn start_practice(
    assignment: &Assignment,
    now: DateTime<Utc>,
) -> Result<(Assignment, Placement), Denial> {
    let status = transition(assignment.status, AssignmentEvent::StartPractice)?;

    let mut next = assignment.clone();
    next.status = status;
    next.updated_at = now;

    let placement = Placement {
        id: Uuid::new_v4(),
        apprentice_id: assignment.apprentice_id,
        company_id: assignment.company_id,
        tutor: assignment.proposed_tutor.clone(),
        start_date: assignment.proposed_start_date,
        end_date: Some(assignment.proposed_end_date),
        objectives: assignment.proposed_objectives.clone(),
        logbook: String::new(),
        status: PlacementStatus::Productive,
        origin_assignment_id: Some(assignment.id),
    };

    Ok((next, placement))
}

/// Añadir una línea de auditoría a las observaciones sin alterar lo anterior
pub fn append_note(notes: &str, label: &str, text: &str, at: DateTime<Utc>) -> String {
    let line = format!("[{}] {}: {}", at.format("%Y-%m-%d %H:%M"), label, text.trim());
    if notes.trim().is_empty() {
        line
    } else {
        format!("{}\n{}", notes.trim_end(), line)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssignmentModality;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap()
    }

    fn assignment(status: AssignmentStatus) -> Assignment {
        let start = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        Assignment {
            id: Uuid::new_v4(),
            apprentice_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            proposed_start_date: start,
            proposed_end_date: start + Duration::days(180),
            status,
            modality: AssignmentModality::Hybrid,
            proposed_tutor: "Laura Gómez".to_string(),
            work_area: "Desarrollo".to_string(),
            proposed_objectives: "Apoyar el equipo de backend".to_string(),
            company_contact_name: String::new(),
            company_contact_phone: String::new(),
            company_contact_email: String::new(),
            notes: String::new(),
            created_at: now() - Duration::days(3),
            confirmed_at: None,
            updated_at: now() - Duration::days(3),
            created_by: None,
        }
    }

    #[test]
    fn transition_table_is_exhaustive() {
        use AssignmentEvent as E;
        use AssignmentStatus as S;

        let allowed = [
            (S::Assigned, E::Confirm, S::Confirmed),
            (S::Pending, E::Reject, S::Rejected),
            (S::Assigned, E::Reject, S::Rejected),
            (S::Confirmed, E::StartPractice, S::Started),
            (S::Pending, E::Cancel, S::Canceled),
            (S::Assigned, E::Cancel, S::Canceled),
            (S::Confirmed, E::Cancel, S::Canceled),
            (S::Rejected, E::Cancel, S::Canceled),
            (S::Pending, E::Edit, S::Pending),
            (S::Assigned, E::Edit, S::Assigned),
        ];

        for from in AssignmentStatus::ALL {
            for event in AssignmentEvent::ALL {
                let expected = allowed
                    .iter()
                    .find(|(f, e, _)| *f == from && *e == event)
                    .map(|(_, _, to)| *to);
                match expected {
                    Some(to) => {
                        assert_eq!(transition(from, event), Ok(to), "{:?} {:?}", from, event)
                    }
                    None => assert_eq!(
                        transition(from, event),
                        Err(Denial::NotAllowed { event, from }),
                        "{:?} {:?}",
                        from,
                        event
                    ),
                }
            }
        }
    }

    #[test]
    fn terminal_states_allow_nothing() {
        assert!(allowed_events(AssignmentStatus::Started).is_empty());
        assert!(allowed_events(AssignmentStatus::Canceled).is_empty());
        assert_eq!(
            allowed_events(AssignmentStatus::Rejected),
            vec![AssignmentEvent::Cancel]
        );
    }

    #[test]
    fn confirm_sets_timestamp_and_optional_note() {
        let original = assignment(AssignmentStatus::Assigned);
        let confirmed = confirm(&original, Some("Empresa confirmó por correo"), now()).unwrap();

        assert_eq!(confirmed.status, AssignmentStatus::Confirmed);
        assert_eq!(confirmed.confirmed_at, Some(now()));
        assert_eq!(
            confirmed.notes,
            "[2026-03-02 09:30] Confirmación: Empresa confirmó por correo"
        );

        let silent = confirm(&original, Some("   "), now()).unwrap();
        assert!(silent.notes.is_empty());
    }

    #[test]
    fn confirm_requires_assigned() {
        let pending = assignment(AssignmentStatus::Pending);
        assert!(matches!(
            confirm(&pending, None, now()),
            Err(Denial::NotAllowed { event: AssignmentEvent::Confirm, .. })
        ));
    }

    #[test]
    fn reject_requires_a_reason() {
        let pending = assignment(AssignmentStatus::Pending);
        assert_eq!(reject(&pending, None, now()), Err(Denial::ReasonRequired));
        assert_eq!(reject(&pending, Some("  "), now()), Err(Denial::ReasonRequired));
    }

    #[test]
    fn reject_appends_to_existing_notes() {
        let mut pending = assignment(AssignmentStatus::Pending);
        pending.notes = "Primer contacto telefónico".to_string();

        let rejected = reject(&pending, Some("Sin cupos disponibles"), now()).unwrap();
        assert_eq!(rejected.status, AssignmentStatus::Rejected);
        assert_eq!(
            rejected.notes,
            "Primer contacto telefónico\n[2026-03-02 09:30] Rechazo: Sin cupos disponibles"
        );
    }

    #[test]
    fn reject_guard_is_checked_before_the_reason() {
        let confirmed = assignment(AssignmentStatus::Confirmed);
        assert!(matches!(
            reject(&confirmed, None, now()),
            Err(Denial::NotAllowed { .. })
        ));
    }

    #[test]
    fn cancel_keeps_reason_optional() {
        let rejected = assignment(AssignmentStatus::Rejected);
        let canceled = cancel(&rejected, None, now()).unwrap();
        assert_eq!(canceled.status, AssignmentStatus::Canceled);
        assert!(canceled.notes.is_empty());

        let started = assignment(AssignmentStatus::Started);
        assert!(cancel(&started, Some("tarde"), now()).is_err());
    }

    #[test]
    fn start_practice_derives_a_productive_placement() {
        let confirmed = assignment(AssignmentStatus::Confirmed);
        let (started, placement) = start_practice(&confirmed, now()).unwrap();

        assert_eq!(started.status, AssignmentStatus::Started);
        assert_eq!(placement.status, PlacementStatus::Productive);
        assert_eq!(placement.origin_assignment_id, Some(confirmed.id));
        assert_eq!(placement.tutor, confirmed.proposed_tutor);
        assert_eq!(placement.start_date, confirmed.proposed_start_date);
        assert_eq!(placement.end_date, Some(confirmed.proposed_end_date));
        assert_eq!(placement.objectives, confirmed.proposed_objectives);
        assert!(placement.logbook.is_empty());
    }

    #[test]
    fn start_practice_twice_is_denied() {
        let confirmed = assignment(AssignmentStatus::Confirmed);
        let (started, _) = start_practice(&confirmed, now()).unwrap();
        assert_eq!(
            start_practice(&started, now()).unwrap_err(),
            Denial::NotAllowed {
                event: AssignmentEvent::StartPractice,
                from: AssignmentStatus::Started,
            }
        );
    }

    #[test]
    fn denial_message_names_the_state() {
        let denial = Denial::NotAllowed {
            event: AssignmentEvent::Edit,
            from: AssignmentStatus::Confirmed,
        };
        assert_eq!(
            denial.to_string(),
            "La asignación no puede modificarse: está en estado Confirmado"
        );
    }
}
