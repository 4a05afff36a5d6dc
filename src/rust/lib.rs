//! Asks a remote image classifier whether Jangle will eat what's in a picture.
//!
//! Jangle eats almost anything, except durian. The heavy lifting happens in a
//! hosted model; this crate gets an image there (from a local file or a URL),
//! normalizes whatever shape the answer comes back in, and turns the label
//! into a verdict.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use jangle::{ClassificationClient, ImageFile, InputMode, Session, TransportStrategy};
//!
//! let client = ClassificationClient::builder()
//!     .with_transport(TransportStrategy::MultipartPost)
//!     .with_development(true)
//!     .build()?;
//!
//! let mut session = Session::new(client, InputMode::Tabbed);
//! session.select_file(ImageFile::load("lunch.jpg").await?)?;
//! let state = session.submit_file().await?;
//!
//! for line in jangle::render(state) {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Transports
//!
//! * [`TransportStrategy::MultipartPost`] posts the bytes to `<base>/api/predict`.
//! * [`TransportStrategy::RpcPredict`] opens a session with a hosted space and
//!   calls its `/predict` operation.

pub mod classifier;
pub mod config;
pub mod session;
pub mod source;
pub mod verdict;

pub use classifier::{
    normalize_flat, normalize_rpc, ClassificationClient, ClassificationResult, Classify,
    ClassifyError, ClientBuilder, ClientInfo,
};
pub use config::{ClientConfig, InputMode, TransportStrategy};
pub use session::{RequestState, RequestTicket, Session, Tab};
pub use source::{ImageFile, ImagePayload, ImageSource};
pub use verdict::{confidence_percent, label_to_verdict, render, Verdict, VerdictStyle};

pub fn init_logger() {
    env_logger::init();
}
