//! Key classification for the form's reset trigger.
//!
//! Keys that change field content hide a previously generated password on
//! keydown already, before the browser fires `change`. The classification is
//! a lookup table built at compile time from legacy `keyCode` values.

/// `keyCode` of the Enter key.
pub const ENTER: u32 = 13;

const BACKSPACE: u32 = 8;
const SPACE: u32 = 32;

/// Delete, digits and letters.
const EDITING_AND_ALPHANUMERIC: (u32, u32) = (46, 90);
/// Numeric keypad digits and operators.
const KEYPAD: (u32, u32) = (96, 111);
/// Punctuation (`;` `=` `,` `-` `.` `/` `` ` `` `[` `\` `]` `'`).
const PUNCTUATION: (u32, u32) = (186, 222);

static CONTENT_ALTERING: [bool; 256] = build_table();

const fn build_table() -> [bool; 256] {
    let mut table = [false; 256];
    table[BACKSPACE as usize] = true;
    table[SPACE as usize] = true;

    let ranges = [EDITING_AND_ALPHANUMERIC, KEYPAD, PUNCTUATION];
    let mut r = 0;
    while r < ranges.len() {
        let (start, end) = ranges[r];
        let mut code = start;
        while code <= end {
            table[code as usize] = true;
            code += 1;
        }
        r += 1;
    }
    table
}

/// What a keydown means to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// Alters field content: reset the form.
    ContentAltering,
    /// Enter: blur the field and submit.
    Submit,
    /// Navigation, modifiers and everything else: no effect.
    Other,
}

impl KeyClass {
    /// Classify a `keyCode`.
    pub fn of(code: u32) -> Self {
        if code == ENTER {
            return Self::Submit;
        }

        let altering = usize::try_from(code)
            .ok()
            .and_then(|index| CONTENT_ALTERING.get(index))
            .copied()
            .unwrap_or(false);

        if altering { Self::ContentAltering } else { Self::Other }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_submits() {
        assert_eq!(KeyClass::of(ENTER), KeyClass::Submit);
    }

    #[test]
    fn typing_keys_alter_content() {
        for code in [8, 32, 46, 48, 57, 65, 90, 96, 105, 111, 186, 191, 222] {
            assert_eq!(KeyClass::of(code), KeyClass::ContentAltering, "keyCode {code}");
        }
    }

    #[test]
    fn navigation_and_modifiers_do_not() {
        // tab, shift, ctrl, alt, escape, page up, arrows, insert, meta, F1, F12
        for code in [9, 16, 17, 18, 27, 33, 37, 40, 45, 91, 112, 123, 185, 223] {
            assert_eq!(KeyClass::of(code), KeyClass::Other, "keyCode {code}");
        }
    }

    #[test]
    fn out_of_table_codes_are_other() {
        assert_eq!(KeyClass::of(256), KeyClass::Other);
        assert_eq!(KeyClass::of(u32::MAX), KeyClass::Other);
    }
}
