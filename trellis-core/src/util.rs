pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Sends the error to the log and evaluates to it.
macro_rules! logged {
    ($error:expr) => {{
        let error = $error;
        log::error!("{:#}", error);
        error
    }};
}
