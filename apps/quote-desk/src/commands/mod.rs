//! # Commands Module
//!
//! Every operation a caller (the CLI, or a form front-end) can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── quotation.rs  ◄─── Pricing, draft edits, submission
//! └── render.rs     ◄─── Plain-text totals box
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Pure pricing, no state
//! fn price_items(items: &[LineItem])
//!
//! // Needs the open draft
//! fn update_line(drafts: &DraftState, line: usize, item: LineItem)
//!
//! // Needs both
//! fn submit_quotation(drafts: &DraftState, config: &ConfigState, submitted_at: DateTime<Utc>)
//! ```

pub mod quotation;
pub mod render;

pub use quotation::*;
pub use render::render_text;
