#[inline]
pub fn is_alphabetic(c: char) -> bool {
    ('a'..='z').contains(&c) || ('A'..='Z').contains(&c) || c == '_'
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    ('0'..='9').contains(&c)
}

#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    is_alphabetic(c) || is_numeric(c)
}
