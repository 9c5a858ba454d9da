pub mod redirect;
pub mod tokenize;
pub mod types;

pub use redirect::{EagerCreate, ResolveRedirect};
pub use tokenize::{split_words, tokenize, Tokenized};
pub use types::{Input, RedirectKind, RedirectMode, RedirectTarget, Word};
