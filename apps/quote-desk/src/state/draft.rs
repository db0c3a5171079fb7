//! # Draft State
//!
//! Holds the quotation currently being edited.
//!
//! ## Reducer Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Edits                                          │
//! │                                                                         │
//! │  Form Action              DraftAction                Draft Change       │
//! │  ───────────              ───────────                ────────────       │
//! │                                                                         │
//! │  "Add row" ─────────────► AddLine(item) ──────────► items.push(item)   │
//! │                                                                         │
//! │  Edit a cell ───────────► UpdateLine { line } ────► items[line] = item │
//! │                                                                         │
//! │  "Remove row" ──────────► RemoveLine { line } ────► items.remove(line) │
//! │                                                                         │
//! │  Header fields ─────────► SetTitle / SetNumber ───► header updated     │
//! │                                                                         │
//! │  Send / recall ─────────► ChangeStatus(next) ─────► lifecycle checked  │
//! │                                                                         │
//! │  Every accepted action ends with a full recompute:                      │
//! │      breakdown(items) ──► Ok(totals)  or  Err(InvalidLineItem)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An invalid row does not reject the edit. The draft keeps it, stores the
//! error for display, and refuses to submit until it is fixed.

use std::sync::{Mutex, PoisonError};

use chrono::{NaiveDate, Utc};
use quote_core::{
    breakdown, CoreError, CoreResult, DocumentBreakdown, DocumentTotals, LineItem, Quotation,
    QuotationStatus,
};

/// One edit to a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftAction {
    /// Appends a row.
    AddLine(LineItem),
    /// Replaces the row at `line` (0-based).
    UpdateLine { line: usize, item: LineItem },
    /// Deletes the row at `line` (0-based).
    RemoveLine { line: usize },
    SetNumber(String),
    SetTitle(String),
    SetClient(Option<String>),
    SetExpiry(Option<NaiveDate>),
    SetNotes(Option<String>),
    /// Moves the quotation through its lifecycle.
    ChangeStatus(QuotationStatus),
}

impl DraftAction {
    /// Status changes are the only action accepted outside `Draft`.
    fn requires_editable(&self) -> bool {
        !matches!(self, DraftAction::ChangeStatus(_))
    }
}

/// A quotation under edit plus the result of its latest recompute.
#[derive(Debug, Clone)]
pub struct QuotationDraft {
    quotation: Quotation,
    computed: CoreResult<DocumentBreakdown>,
}

impl QuotationDraft {
    /// Starts a new draft with a single starter row.
    ///
    /// The starter row is usually a zero line, so a brand-new draft shows
    /// all-zero totals.
    pub fn new(
        id: impl Into<String>,
        tenant_id: impl Into<String>,
        issued_on: NaiveDate,
        starter: LineItem,
    ) -> Self {
        let now = Utc::now();
        QuotationDraft::from_quotation(Quotation {
            id: id.into(),
            tenant_id: tenant_id.into(),
            quotation_number: String::new(),
            client_id: None,
            title: String::new(),
            status: QuotationStatus::Draft,
            issued_on,
            expires_on: None,
            items: vec![starter],
            notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Wraps an existing quotation and computes its totals.
    pub fn from_quotation(quotation: Quotation) -> Self {
        let computed = breakdown(&quotation.items);
        QuotationDraft {
            quotation,
            computed,
        }
    }

    /// Opens a stored quotation by replaying its rows as `AddLine` edits.
    ///
    /// Replaying is not an edit: `updated_at` keeps its stored value.
    pub fn replay(mut quotation: Quotation) -> CoreResult<Self> {
        let updated_at = quotation.updated_at;
        let items = std::mem::take(&mut quotation.items);

        let mut draft = QuotationDraft::from_quotation(quotation);
        for item in items {
            draft.apply(DraftAction::AddLine(item))?;
        }
        draft.quotation.updated_at = updated_at;
        Ok(draft)
    }

    /// Applies one edit and recomputes.
    ///
    /// ## Errors
    /// - `NotEditable` for any edit other than a status change on a
    ///   non-draft quotation
    /// - `LineNotFound` when `line` is out of bounds
    /// - `InvalidStatusTransition` for a disallowed lifecycle move
    ///
    /// A rejected action leaves the draft untouched.
    pub fn apply(&mut self, action: DraftAction) -> CoreResult<()> {
        let status = self.quotation.status;
        if action.requires_editable() && !status.is_editable() {
            return Err(CoreError::NotEditable { status });
        }

        let q = &mut self.quotation;
        match action {
            DraftAction::AddLine(item) => q.items.push(item),
            DraftAction::UpdateLine { line, item } => {
                let slot = q
                    .items
                    .get_mut(line)
                    .ok_or(CoreError::LineNotFound { line })?;
                *slot = item;
            }
            DraftAction::RemoveLine { line } => {
                if line >= q.items.len() {
                    return Err(CoreError::LineNotFound { line });
                }
                q.items.remove(line);
            }
            DraftAction::SetNumber(number) => q.quotation_number = number.trim().to_string(),
            DraftAction::SetTitle(title) => q.title = title.trim().to_string(),
            DraftAction::SetClient(client_id) => q.client_id = client_id,
            DraftAction::SetExpiry(expires_on) => q.expires_on = expires_on,
            DraftAction::SetNotes(notes) => q.notes = notes,
            DraftAction::ChangeStatus(next) => q.status = status.transition_to(next)?,
        }

        q.updated_at = Utc::now();
        self.recompute();
        Ok(())
    }

    /// Recomputes the breakdown from the current rows.
    ///
    /// The previous result is always replaced.
    pub fn recompute(&mut self) {
        self.computed = breakdown(&self.quotation.items);
    }

    pub fn quotation(&self) -> &Quotation {
        &self.quotation
    }

    /// Latest breakdown, `None` while a row is invalid.
    pub fn breakdown(&self) -> Option<&DocumentBreakdown> {
        self.computed.as_ref().ok()
    }

    /// Error from the latest recompute, if any.
    pub fn error(&self) -> Option<&CoreError> {
        self.computed.as_ref().err()
    }

    /// Totals for display: zeros while a row is invalid.
    pub fn display_totals(&self) -> DocumentTotals {
        self.breakdown()
            .map(|b| b.totals)
            .unwrap_or_else(DocumentTotals::zero)
    }

    /// True when the draft prices cleanly and is still a draft.
    pub fn is_submittable(&self) -> bool {
        self.quotation.status.is_editable() && self.computed.is_ok()
    }

    /// Hands out the quotation for submission.
    pub fn into_quotation(self) -> Quotation {
        self.quotation
    }
}

// =============================================================================
// Shared Draft State
// =============================================================================

/// Thread-safe holder for the open draft, if any.
#[derive(Debug, Default)]
pub struct DraftState {
    draft: Mutex<Option<QuotationDraft>>,
}

impl DraftState {
    /// Creates a state with no open draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the open draft.
    pub fn open(&self, draft: QuotationDraft) {
        let mut slot = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(draft);
    }

    /// Closes the open draft and returns it.
    pub fn take(&self) -> Option<QuotationDraft> {
        self.draft
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Executes a function with read access to the draft.
    pub fn with_draft<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&QuotationDraft) -> R,
    {
        let draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        draft.as_ref().map(f)
    }

    /// Executes a function with write access to the draft.
    pub fn with_draft_mut<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut QuotationDraft) -> R,
    {
        let mut draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        draft.as_mut().map(f)
    }
}
