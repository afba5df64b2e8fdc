//! Guarded status transitions for adoptions and volunteers.
//!
//! # Purpose
//! The two guarded state machines live here as explicit tables so every
//! legal move is visible in one place. Stores consult these before writing;
//! anything not in a table is an invalid transition.
use crate::model::adoption::AdoptionStatus;
use crate::model::pet::PetStatus;
use crate::model::volunteer::VolunteerStatus;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdoptionAction {
    Approve,
    Reject,
    Complete,
}

impl AdoptionAction {
    pub const fn label(&self) -> &'static str {
        match self {
            AdoptionAction::Approve => "approve",
            AdoptionAction::Reject => "reject",
            AdoptionAction::Complete => "complete",
        }
    }

    /// Action response body text, matching the public API wording.
    pub const fn message(&self) -> &'static str {
        match self {
            AdoptionAction::Approve => "Adoption application approved",
            AdoptionAction::Reject => "Adoption application rejected",
            AdoptionAction::Complete => "Adoption completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolunteerAction {
    Approve,
    Reject,
}

impl VolunteerAction {
    pub const fn label(&self) -> &'static str {
        match self {
            VolunteerAction::Approve => "approve",
            VolunteerAction::Reject => "reject",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            VolunteerAction::Approve => "Volunteer approved",
            VolunteerAction::Reject => "Volunteer rejected",
        }
    }
}

/// A status action was attempted from a state it does not accept.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot {action} from status \"{actual}\"; requires status \"{required}\"")]
pub struct TransitionError {
    pub action: &'static str,
    pub required: &'static str,
    pub actual: &'static str,
}

const ADOPTION_TRANSITIONS: &[(AdoptionStatus, AdoptionAction, AdoptionStatus)] = &[
    (AdoptionStatus::Pending, AdoptionAction::Approve, AdoptionStatus::Approved),
    (AdoptionStatus::Pending, AdoptionAction::Reject, AdoptionStatus::Rejected),
    (AdoptionStatus::Approved, AdoptionAction::Complete, AdoptionStatus::Completed),
];

const VOLUNTEER_TRANSITIONS: &[(VolunteerStatus, VolunteerAction, VolunteerStatus)] = &[
    (VolunteerStatus::Pending, VolunteerAction::Approve, VolunteerStatus::Approved),
    (VolunteerStatus::Pending, VolunteerAction::Reject, VolunteerStatus::Rejected),
];

/// Precondition state for an adoption action.
pub const fn adoption_required(action: AdoptionAction) -> AdoptionStatus {
    match action {
        AdoptionAction::Approve | AdoptionAction::Reject => AdoptionStatus::Pending,
        AdoptionAction::Complete => AdoptionStatus::Approved,
    }
}

/// Resolve the target state for an adoption action.
///
/// # Errors
/// - `TransitionError` when the current status does not accept the action.
pub fn adoption_target(
    current: AdoptionStatus,
    action: AdoptionAction,
) -> Result<AdoptionStatus, TransitionError> {
    for (from, table_action, to) in ADOPTION_TRANSITIONS {
        if *from == current && *table_action == action {
            return Ok(*to);
        }
    }
    Err(TransitionError {
        action: action.label(),
        required: adoption_required(action).as_str(),
        actual: current.as_str(),
    })
}

/// Pet status side effect of a successful adoption action, if any.
pub const fn pet_status_after(action: AdoptionAction) -> Option<PetStatus> {
    match action {
        AdoptionAction::Approve => Some(PetStatus::Pending),
        AdoptionAction::Complete => Some(PetStatus::Adopted),
        AdoptionAction::Reject => None,
    }
}

/// Resolve the target state for a volunteer action.
///
/// # Errors
/// - `TransitionError` when the current status does not accept the action.
pub fn volunteer_target(
    current: VolunteerStatus,
    action: VolunteerAction,
) -> Result<VolunteerStatus, TransitionError> {
    for (from, table_action, to) in VOLUNTEER_TRANSITIONS {
        if *from == current && *table_action == action {
            return Ok(*to);
        }
    }
    Err(TransitionError {
        action: action.label(),
        required: VolunteerStatus::Pending.as_str(),
        actual: current.as_str(),
    })
}
