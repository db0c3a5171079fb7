//! # quote-desk Entry Point
//!
//! The actual setup is in lib.rs for better testability.

fn main() -> anyhow::Result<()> {
    quote_desk_lib::run()
}
