//! # Quotation Commands
//!
//! Commands for pricing, editing and submitting quotations.
//!
//! ## Quotation Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Quotation Lifecycle                                  │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │   New    │────►│ Editing  │────►│  Valid   │────►│ Submitted│       │
//! │  │  Draft   │     │          │◄────│  Draft   │     │ (payload)│       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │   new_draft        add_line                          submit_quotation  │
//! │   open_quotation   update_line                                         │
//! │                    remove_line                                         │
//! │                    edit_header                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use quote_core::{
    breakdown, prepare_submission, CoreError, DocumentBreakdown, DocumentTotals, LineItem,
    Quotation, QuotationStatus, QuotationSubmission,
};

use crate::error::{ApiError, ErrorCode};
use crate::state::{ConfigState, DraftAction, DraftState, QuotationDraft};

/// Draft response including the quotation and its latest totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub quotation: Quotation,
    /// Per-line amounts and tax summary; absent while a row is invalid.
    pub breakdown: Option<DocumentBreakdown>,
    /// Totals to display (zeros while a row is invalid).
    pub totals: DocumentTotals,
    pub error: Option<ApiError>,
    pub submittable: bool,
}

impl From<&QuotationDraft> for DraftResponse {
    fn from(draft: &QuotationDraft) -> Self {
        DraftResponse {
            quotation: draft.quotation().clone(),
            breakdown: draft.breakdown().cloned(),
            totals: draft.display_totals(),
            error: draft.error().cloned().map(ApiError::from),
            submittable: draft.is_submittable(),
        }
    }
}

/// Prices a list of rows without any draft.
pub fn price_items(items: &[LineItem]) -> Result<DocumentBreakdown, ApiError> {
    debug!(items = items.len(), "price_items command");
    let result = breakdown(items)?;
    info!(
        items = items.len(),
        total = %result.totals.total,
        "Items priced"
    );
    Ok(result)
}

/// Starts a new draft with one blank row and opens it.
///
/// The blank row carries the configured default tax, if any.
pub fn new_draft(
    drafts: &DraftState,
    config: &ConfigState,
    issued_on: NaiveDate,
) -> DraftResponse {
    let id = Uuid::new_v4().to_string();
    debug!(draft_id = %id, "new_draft command");

    let draft = QuotationDraft::new(id, config.tenant_id.clone(), issued_on, blank_line(config));
    let response = DraftResponse::from(&draft);
    drafts.open(draft);
    response
}

/// Opens an existing quotation for editing.
///
/// Its rows are replayed through the reducer one by one, so the draft ends
/// up in the same state as if they had been typed in. The stored
/// `updated_at` is kept.
pub fn open_quotation(
    drafts: &DraftState,
    quotation: Quotation,
) -> Result<DraftResponse, ApiError> {
    debug!(quotation_id = %quotation.id, "open_quotation command");

    if !quotation.status.is_editable() {
        return Err(CoreError::NotEditable {
            status: quotation.status,
        }
        .into());
    }

    let draft = QuotationDraft::replay(quotation)?;

    if let Some(err) = draft.error() {
        warn!(quotation_id = %draft.quotation().id, error = %err, "Opened draft has invalid rows");
    }

    let response = DraftResponse::from(&draft);
    drafts.open(draft);
    Ok(response)
}

/// Gets the open draft.
pub fn get_draft(drafts: &DraftState) -> Result<DraftResponse, ApiError> {
    debug!("get_draft command");
    drafts
        .with_draft(|d| DraftResponse::from(d))
        .ok_or_else(no_open_draft)
}

/// Appends a row: the given one, or a blank row with the default tax.
pub fn add_line(
    drafts: &DraftState,
    config: &ConfigState,
    item: Option<LineItem>,
) -> Result<DraftResponse, ApiError> {
    let item = item.unwrap_or_else(|| blank_line(config));
    apply(drafts, DraftAction::AddLine(item))
}

/// Replaces the row at `line` (0-based).
pub fn update_line(
    drafts: &DraftState,
    line: usize,
    item: LineItem,
) -> Result<DraftResponse, ApiError> {
    apply(drafts, DraftAction::UpdateLine { line, item })
}

/// Removes the row at `line` (0-based).
pub fn remove_line(drafts: &DraftState, line: usize) -> Result<DraftResponse, ApiError> {
    apply(drafts, DraftAction::RemoveLine { line })
}

/// Moves the open draft through its lifecycle.
pub fn change_status(
    drafts: &DraftState,
    next: QuotationStatus,
) -> Result<DraftResponse, ApiError> {
    apply(drafts, DraftAction::ChangeStatus(next))
}

/// Applies any edit to the open draft.
///
/// Every row or header command funnels through here.
pub fn apply(drafts: &DraftState, action: DraftAction) -> Result<DraftResponse, ApiError> {
    debug!(?action, "apply command");

    let response = drafts
        .with_draft_mut(|draft| {
            draft.apply(action)?;
            if let Some(err) = draft.error() {
                warn!(error = %err, "Draft has invalid rows");
            }
            Ok::<_, CoreError>(DraftResponse::from(&*draft))
        })
        .ok_or_else(no_open_draft)??;

    Ok(response)
}

/// Submits the open draft.
///
/// ## Behavior
/// - Refuses while a row is invalid or the quotation is not a draft
/// - Fills a missing expiry date with `issued_on + validity_days`
/// - Closes the draft on success
///
/// ## Returns
/// The payload for the persistence API, carrying exactly the numbers the
/// pricing core produced.
pub fn submit_quotation(
    drafts: &DraftState,
    config: &ConfigState,
    submitted_at: DateTime<Utc>,
) -> Result<QuotationSubmission, ApiError> {
    debug!("submit_quotation command");

    let draft = drafts.take().ok_or_else(no_open_draft)?;
    if !draft.is_submittable() {
        let err = match draft.error() {
            Some(err) => ApiError::from(err.clone()),
            None => ApiError::from(CoreError::NotEditable {
                status: draft.quotation().status,
            }),
        };
        warn!(quotation_id = %draft.quotation().id, error = %err, "Submit refused");
        drafts.open(draft);
        return Err(err);
    }

    let quotation = draft.into_quotation();
    let restore = quotation.clone();
    let result = with_default_expiry(quotation, config.validity_days)
        .and_then(|q| prepare_submission(q, submitted_at).map_err(ApiError::from));

    match result {
        Ok(submission) => {
            info!(
                quotation_id = %submission.quotation.id,
                number = %submission.quotation.quotation_number,
                lines = submission.lines.len(),
                total = %submission.totals.total,
                "Quotation submitted"
            );
            Ok(submission)
        }
        Err(err) => {
            warn!(quotation_id = %restore.id, error = %err, "Submit refused");
            drafts.open(QuotationDraft::from_quotation(restore));
            Err(err)
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn blank_line(config: &ConfigState) -> LineItem {
    let mut line = LineItem::default();
    if let Some(tax) = &config.default_tax {
        line.tax_entries.push(tax.clone());
    }
    line
}

fn with_default_expiry(mut quotation: Quotation, validity_days: i64) -> Result<Quotation, ApiError> {
    if quotation.expires_on.is_none() {
        let expires_on = quotation
            .issued_on
            .checked_add_signed(Duration::days(validity_days))
            .ok_or_else(|| ApiError::internal("Expiry date out of range"))?;
        quotation.expires_on = Some(expires_on);
    }
    Ok(quotation)
}

fn no_open_draft() -> ApiError {
    ApiError::new(ErrorCode::NotFound, "No open draft")
}
