use chub_derive::chub_error;
use std::borrow::Cow;

#[chub_error]
pub enum SealError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_export() -> Result<(), SealError> {
    let failed: Result<(), std::io::Error> = Err(std::io::Error::other("disk"));
    failed.context("Reading export")
}

fn main() {
    let err = read_export().unwrap_err();
    assert_eq!(err.to_string(), "IO error (Reading export): disk");

    let err: SealError = "boom".into();
    assert_eq!(err.to_string(), "Internal error: boom");

    let err = Err::<(), _>(SealError::from(String::from("late")))
        .context("Opening records")
        .unwrap_err();
    assert_eq!(err.to_string(), "Internal error (Opening records): late");
}
