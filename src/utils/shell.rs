/// Quote a string for display in a shell-like command line.
///
/// Arguments made only of safe characters are returned as-is; anything else
/// is wrapped in single quotes, with embedded quotes escaped.
///
/// # Examples
///
/// ```
/// use agent_deploy::utils::shell::quote;
///
/// assert_eq!(quote("install"), "install");
/// assert_eq!(quote("hello world"), "'hello world'");
/// assert_eq!(quote("foo'bar"), "'foo'\\''bar'");
/// ```
pub fn quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@%+,".contains(c));

    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Render a program and its arguments as a single printable command line.
///
/// # Examples
///
/// ```
/// use agent_deploy::utils::shell::display_command;
///
/// assert_eq!(display_command("poetry", &["install"]), "poetry install");
/// assert_eq!(
///     display_command("poetry", &["run", "python", "remote script.py"]),
///     "poetry run python 'remote script.py'"
/// );
/// ```
pub fn display_command(program: &str, args: &[impl AsRef<str>]) -> String {
    std::iter::once(quote(program))
        .chain(args.iter().map(|arg| quote(arg.as_ref())))
        .collect::<Vec<_>>()
        .join(" ")
}
