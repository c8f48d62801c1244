//! CEP input mask: digit normalization, `DDDDD-DDD` rendering and caret upkeep.

use crate::domain::model::{CEP_DIGITS, CEP_PREFIX_DIGITS};
use crate::domain::ports::FormField;

/// Keeps ASCII digits only, truncated to 8.
pub fn normalize_cep(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(CEP_DIGITS)
        .collect()
}

/// Renders the digit run, inserting the hyphen once more than 5 digits are present.
pub fn format_cep(raw: &str) -> String {
    let digits = normalize_cep(raw);
    if digits.len() <= CEP_PREFIX_DIGITS {
        return digits;
    }
    let (prefix, suffix) = digits.split_at(CEP_PREFIX_DIGITS);
    format!("{}-{}", prefix, suffix)
}

/// Shifts the caret by the length delta the mask introduced, clamped to `[0, formatted_len]`.
pub fn caret_after_format(prev_len: usize, formatted_len: usize, caret: usize) -> usize {
    let shifted = caret as isize + (formatted_len as isize - prev_len as isize);
    shifted.clamp(0, formatted_len as isize) as usize
}

/// Content-change handler: rewrites the field with its masked value.
pub fn apply_mask<F: FormField + ?Sized>(field: &F) {
    let caret = field.selection_start();
    let prev = field.value();
    let formatted = format_cep(&prev);

    if formatted == prev {
        return;
    }

    field.set_value(&formatted);
    tracing::trace!("CEP mask: {:?} -> {:?}", prev, formatted);

    // 只在欄位有焦點時調整游標，盡量維持在原位附近
    if let Some(start) = caret {
        if field.has_focus() {
            let pos =
                caret_after_format(prev.chars().count(), formatted.chars().count(), start);
            field.set_selection_range(pos, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryField;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_strips_and_truncates() {
        assert_eq!(normalize_cep(""), "");
        assert_eq!(normalize_cep("01001-000"), "01001000");
        assert_eq!(normalize_cep(" 0a1b0c0 1-0 0 0 99"), "01001000");
        assert_eq!(normalize_cep("abc"), "");
    }

    #[test]
    fn test_format_short_and_full() {
        assert_eq!(format_cep("1234"), "1234");
        assert_eq!(format_cep("12345"), "12345");
        assert_eq!(format_cep("123456"), "12345-6");
        assert_eq!(format_cep("12345678"), "12345-678");
        assert_eq!(format_cep("123456789"), "12345-678");
        assert_eq!(format_cep("12.345-678"), "12345-678");
    }

    #[test]
    fn test_format_ignores_non_ascii_digits() {
        // 全形與阿拉伯-印度數字不算數字
        assert_eq!(format_cep("１２３"), "");
        assert_eq!(format_cep("٣12"), "12");
    }

    #[test]
    fn test_caret_after_format() {
        // "123456" -> "12345-6", caret at end moves past the hyphen
        assert_eq!(caret_after_format(6, 7, 6), 7);
        // "12345-6x" -> "12345-6", caret after the stray char steps back
        assert_eq!(caret_after_format(8, 7, 8), 7);
        // deleting many characters never goes below zero
        assert_eq!(caret_after_format(10, 0, 2), 0);
        // never beyond the end of the value
        assert_eq!(caret_after_format(3, 9, 5), 9);
    }

    #[test]
    fn test_typing_character_by_character() {
        let field = InMemoryField::focused("");
        let mut shown = Vec::new();

        for ch in "12345678".chars() {
            field.type_char(ch);
            apply_mask(&field);
            shown.push(field.value());
        }

        assert_eq!(
            shown,
            vec![
                "1",
                "12",
                "123",
                "1234",
                "12345",
                "12345-6",
                "12345-67",
                "12345-678"
            ]
        );
        assert_eq!(field.selection_start(), Some(9));
    }

    #[test]
    fn test_apply_mask_without_focus_keeps_caret() {
        let field = InMemoryField::new("01001000");
        field.set_selection_range(3, 3);

        apply_mask(&field);

        assert_eq!(field.value(), "01001-000");
        assert_eq!(field.selection_start(), Some(3));
    }

    #[test]
    fn test_apply_mask_pasted_value() {
        let field = InMemoryField::focused("");
        field.paste("cep: 01.001-000 (SP)");

        apply_mask(&field);

        assert_eq!(field.value(), "01001-000");
        assert_eq!(field.selection_start(), Some(9));
    }

    proptest! {
        #[test]
        fn prop_output_shape(input in ".*") {
            let out = format_cep(&input);
            let digits = out.chars().filter(|c| c.is_ascii_digit()).count();
            let hyphens = out.chars().filter(|c| *c == '-').count();

            prop_assert!(out.chars().all(|c| c.is_ascii_digit() || c == '-'));
            prop_assert!(hyphens <= 1);
            prop_assert!(digits <= CEP_DIGITS);
        }

        #[test]
        fn prop_prefix_split(digits in "[0-9]{0,8}") {
            let out = format_cep(&digits);
            if digits.len() <= CEP_PREFIX_DIGITS {
                prop_assert_eq!(out, digits);
            } else {
                prop_assert_eq!(out, format!("{}-{}", &digits[..5], &digits[5..]));
            }
        }

        #[test]
        fn prop_idempotent(input in ".*") {
            let once = format_cep(&input);
            prop_assert_eq!(format_cep(&once), once);
        }
    }
}
