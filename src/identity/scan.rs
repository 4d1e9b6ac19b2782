//! Scanners that pull people out of directory pages.
//!
//! Each scanner walks a page once, front to back, and gives up as soon as
//! the tokens run out.

use crate::domain::identity::{DotRule, derive_nickname, format_identity, normalize_email};
use crate::identity::tokenizer::{Token, Tokenizer};

/// Tokens a profile card may span after the name before the match is abandoned.
pub const PROFILE_LOOKAHEAD: usize = 30;
/// Tokens between a field label and its value in labelled tables
/// (`</th>`, whitespace, `<td>`, value).
pub const LABEL_VALUE_OFFSET: usize = 4;

const NAME_CLASS: &str = "fn";
const EMAIL_CLASS: &str = "email";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ProfileState {
    SeekingName,
    AwaitingName {
        budget: usize,
    },
    Matching {
        name: String,
        budget: usize,
        alias_seen: bool,
    },
    AwaitingEmail {
        name: String,
        budget: usize,
    },
}

/// Finds `"Name <email>"` for a handle on a page of profile cards.
///
/// A card matches when the handle appears anywhere in the tokens between the
/// `fn` name element and the `email` element. The check is a plain substring
/// test over tag attributes and text, so it also fires on links or image
/// names that merely contain the handle.
pub struct ProfileScan<'h> {
    handle: &'h str,
    state: ProfileState,
}

impl<'h> ProfileScan<'h> {
    pub fn new(handle: &'h str) -> Self {
        Self {
            handle,
            state: ProfileState::SeekingName,
        }
    }

    pub fn run(mut self, page: &str) -> Option<String> {
        Tokenizer::new(page).find_map(|token| self.step(&token))
    }

    fn step(&mut self, token: &Token) -> Option<String> {
        if token.has_class(NAME_CLASS) {
            self.state = ProfileState::AwaitingName {
                budget: PROFILE_LOOKAHEAD,
            };
            return None;
        }

        let state = std::mem::replace(&mut self.state, ProfileState::SeekingName);
        let (next, found) = match state {
            ProfileState::SeekingName => (ProfileState::SeekingName, None),
            ProfileState::AwaitingName { budget: 0 }
            | ProfileState::Matching { budget: 0, .. }
            | ProfileState::AwaitingEmail { budget: 0, .. } => (ProfileState::SeekingName, None),
            ProfileState::AwaitingName { budget } => match token.text() {
                "" => (ProfileState::AwaitingName { budget: budget - 1 }, None),
                name => (
                    ProfileState::Matching {
                        name: name.to_string(),
                        budget: PROFILE_LOOKAHEAD,
                        alias_seen: false,
                    },
                    None,
                ),
            },
            ProfileState::Matching {
                name,
                budget,
                alias_seen,
            } => {
                let alias_seen = alias_seen || token.mentions(self.handle);
                let next = if alias_seen && token.has_class(EMAIL_CLASS) {
                    ProfileState::AwaitingEmail {
                        name,
                        budget: budget - 1,
                    }
                } else {
                    ProfileState::Matching {
                        name,
                        budget: budget - 1,
                        alias_seen,
                    }
                };
                (next, None)
            }
            ProfileState::AwaitingEmail { name, budget } => match token.text() {
                "" => (
                    ProfileState::AwaitingEmail {
                        name,
                        budget: budget - 1,
                    },
                    None,
                ),
                email => {
                    let email = normalize_email(email, DotRule::AtLeastOne);
                    (
                        ProfileState::SeekingName,
                        Some(format_identity(&name, &email)),
                    )
                }
            },
        };

        self.state = next;
        found
    }
}

/// Display name offered for `handle` in a `<select>` of maintainers.
pub fn scan_maintainer_list(page: &str, handle: &str) -> Option<String> {
    let mut tokens = Tokenizer::new(page);
    while let Some(token) = tokens.next() {
        if !token.is_start_tag("option") || token.attribute("value") != Some(handle) {
            continue;
        }
        let label = tokens.next()?;
        if !label.text().is_empty() {
            return Some(label.text().to_string());
        }
    }
    None
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Name,
    Alias,
    Email,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Name => "Name:",
            Field::Alias => "Alias:",
            Field::Email => "Email:",
        }
    }
}

struct LabelCursor {
    tokens: Tokenizer,
}

impl LabelCursor {
    fn new(page: &str) -> Self {
        Self {
            tokens: Tokenizer::new(page),
        }
    }

    /// Moves past the next label for `field` and returns its value.
    fn read(&mut self, field: Field) -> Option<String> {
        let label = field.label();
        self.tokens.find(|token| token.text() == label)?;
        let value = self.tokens.advance(LABEL_VALUE_OFFSET)?;
        Some(value.text().to_string())
    }
}

/// Email of the person called `full_name` on a page of labelled profile
/// tables. A record also matches when its alias looks like the nickname
/// derived from `full_name`.
pub fn scan_labeled_email(page: &str, full_name: &str) -> Option<String> {
    let wanted_name = full_name.to_lowercase();
    let wanted_alias = derive_nickname(full_name).to_lowercase();
    let mut cursor = LabelCursor::new(page);

    loop {
        let name = cursor.read(Field::Name)?;
        let alias = cursor.read(Field::Alias)?;
        let alias = alias.split(' ').next().unwrap_or_default().to_lowercase();

        if name.to_lowercase() != wanted_name && alias != wanted_alias {
            continue;
        }

        let email = cursor.read(Field::Email)?;
        return Some(normalize_email(&email, DotRule::MoreThanOne));
    }
}
