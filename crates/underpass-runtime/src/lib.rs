//! Underpass runtime — message dispatch and host adapters.
//!
//! [`runtime::Runtime`] owns every component and port and is driven by three
//! inputs: inbound boundary messages, asset-load outcomes and display-frame
//! ticks. The `infrastructure` module holds the adapters the headless host
//! binary plugs into it.

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod runtime;
