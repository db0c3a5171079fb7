//! # State Module
//!
//! Application state for quote-desk.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐    │
//! │  │         DraftState           │  │         ConfigState          │    │
//! │  │                              │  │                              │    │
//! │  │  Mutex<Option<               │  │  tenant_id                   │    │
//! │  │    QuotationDraft            │  │  currency code / symbol      │    │
//! │  │  >>                          │  │  default tax, validity days  │    │
//! │  └──────────────────────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  • DraftState: one open draft, edited through DraftAction              │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod draft;

pub use config::{ConfigError, ConfigState};
pub use draft::{DraftAction, DraftState, QuotationDraft};
