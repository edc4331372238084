//! Blindfold API clients
//!
//! [`Blindfold`] blocks the calling thread; [`AsyncBlindfold`] runs on tokio.
//! Both expose the same operations with the same retry behavior:
//!
//! | method | endpoint | options |
//! |---|---|---|
//! | `tokenize` | `/tokenize` | [`CommonOptions`] |
//! | `detect` | `/detect` | [`CommonOptions`] |
//! | `redact` | `/redact` | [`RedactOptions`] |
//! | `mask` | `/mask` | [`MaskOptions`] |
//! | `synthesize` | `/synthesize` | [`SynthesizeOptions`] |
//! | `hash` | `/hash` | [`HashOptions`] |
//! | `encrypt` | `/encrypt` | [`EncryptOptions`] |
//!
//! Every operation has a `*_batch` form posting several texts to
//! `/{operation}/batch`. `detokenize` runs locally.

pub mod blocking;
pub mod nonblocking;
pub mod options;
pub mod request;

pub use blocking::Blindfold;
pub use nonblocking::AsyncBlindfold;
pub use options::{
    AdditionalOptions, CommonOptions, EncryptOptions, HashOptions, MaskOptions,
    OperationOptions, RedactOptions, SynthesizeOptions,
};
pub use request::Operation;
