use crate::error::{Result, SheetError};

/// Parse an A1 cell reference ("A1", "Z99", "AA1", case-insensitive)
/// into 0-based (row, column)
pub fn parse_a1(notation: &str) -> Result<(usize, usize)> {
    let invalid = || SheetError::InvalidCellNotation(notation.to_string());

    let split = notation
        .find(|c: char| c.is_ascii_digit())
        .filter(|&i| i > 0)
        .ok_or_else(invalid)?;
    let (letters, digits) = notation.split_at(split);

    let column = letters_to_index(letters).ok_or_else(invalid)?;
    let row = digits
        .parse::<usize>()
        .ok()
        .filter(|&r| r > 0)
        .ok_or_else(invalid)?;

    Ok((row - 1, column))
}

/// Parse an A1 range ("A1:C3") into its top-left and bottom-right corners.
/// A single reference is a one-cell range; reversed corners are normalized.
pub fn parse_a1_range(notation: &str) -> Result<((usize, usize), (usize, usize))> {
    let Some((first, second)) = notation.split_once(':') else {
        let cell = parse_a1(notation)?;
        return Ok((cell, cell));
    };

    let (r1, c1) = parse_a1(first)?;
    let (r2, c2) = parse_a1(second)?;
    Ok(((r1.min(r2), c1.min(c2)), (r1.max(r2), c1.max(c2))))
}

/// A=0, B=1, ... Z=25, AA=26
fn letters_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}
