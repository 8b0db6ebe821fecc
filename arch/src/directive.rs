use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Storage and control directives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum Directive {
    Align,
    Ascii,
    Bss,
    Byte,
    End,
    Equ,
    Org,
    Word,
}

/// Case-insensitive exact-match lookup into the directive catalog.
pub fn get_dir(name: &str) -> Option<Directive> {
    name.parse::<Directive>().ok()
}
