//! Credential file for the secondary console protocol.
//!
//! Each line maps a protocol account onto a console account:
//!
//! `user:passwd -> console_user:console_passwd`
//!
//! The file is operator-maintained trusted configuration, so every format
//! violation is fatal and names the offending line.

use std::{collections::HashMap, fs, path::Path};

#[derive(PartialEq, Eq, Debug)]
pub struct Credentials {
    pub user: String,
    pub passwd: String,
    pub console_user: String,
    pub console_passwd: String,
}

#[derive(Debug)]
pub struct AuthFile {
    credentials: HashMap<String, Credentials>,
}

impl AuthFile {
    pub fn parse(path: &Path) -> Result<Self, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;

        Self::parse_text(&contents)
    }

    pub fn parse_text(contents: &str) -> Result<Self, String> {
        let mut credentials = HashMap::new();

        for (line_no, line) in contents.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((left, right)) = line.split_once(" -> ") else {
                return Err(format!("missing ' -> ' operator at line {}", line_no + 1));
            };

            let (user, passwd) = split_pair(left, "left", line_no)?;
            let (console_user, console_passwd) = split_pair(right, "right", line_no)?;

            if credentials.contains_key(&user) {
                return Err(format!(
                    "duplicate user '{user}' at line {}",
                    line_no + 1
                ));
            }

            credentials.insert(
                user.clone(),
                Credentials {
                    user,
                    passwd,
                    console_user,
                    console_passwd,
                },
            );
        }

        Ok(AuthFile { credentials })
    }

    pub fn lookup(&self, user: &str) -> Option<&Credentials> {
        self.credentials.get(user)
    }
}

fn split_pair(pair: &str, side: &str, line_no: usize) -> Result<(String, String), String> {
    let Some((user, passwd)) = pair.split_once(':') else {
        return Err(format!(
            "missing ':' operator in {side} credentials at line {}",
            line_no + 1
        ));
    };

    let user = user.trim();

    if user.is_empty() {
        return Err(format!("empty {side} user at line {}", line_no + 1));
    }

    Ok((user.to_owned(), passwd.to_owned()))
}

#[test]
fn parse_and_lookup() {
    let auth = AuthFile::parse_text(
        "# accounts\nadmin:secret -> operator:hunter2\nview:v -> guest:g\n",
    )
    .unwrap();

    assert_eq!(
        auth.lookup("admin"),
        Some(&Credentials {
            user: "admin".into(),
            passwd: "secret".into(),
            console_user: "operator".into(),
            console_passwd: "hunter2".into(),
        })
    );
    assert_eq!(auth.lookup("nobody"), None);
}

#[test]
fn format_violations_are_fatal() {
    assert_eq!(
        AuthFile::parse_text("admin:secret operator:hunter2\n").unwrap_err(),
        "missing ' -> ' operator at line 1"
    );
    assert_eq!(
        AuthFile::parse_text("admin -> operator:hunter2\n").unwrap_err(),
        "missing ':' operator in left credentials at line 1"
    );
    assert_eq!(
        AuthFile::parse_text(":secret -> operator:hunter2\n").unwrap_err(),
        "empty left user at line 1"
    );
    assert_eq!(
        AuthFile::parse_text("a:1 -> b:2\na:3 -> c:4\n").unwrap_err(),
        "duplicate user 'a' at line 2"
    );
}
