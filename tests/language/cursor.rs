//! Integration tests for the source cursor

use cafelisp_language::{Cursor, Mark};

#[test]
fn marks_follow_newlines() {
    let mut cursor = Cursor::new("a\n\nb".chars());
    let mut marks = Vec::new();
    while cursor.peek().is_some() {
        marks.push(cursor.mark());
        cursor.advance();
    }
    assert_eq!(
        marks,
        vec![
            Mark { line: 1, column: 1 },
            Mark { line: 1, column: 2 },
            Mark { line: 2, column: 1 },
            Mark { line: 3, column: 1 },
        ]
    );
}

#[test]
fn location_of_an_earlier_line() {
    let mut cursor = Cursor::new("(print\n  \"x\")".chars());
    let open = cursor.mark();
    while cursor.peek().is_some() {
        cursor.advance();
    }
    let loc = cursor.location(open);
    assert_eq!((loc.line, loc.column), (1, 1));
    assert_eq!(loc.line_text, "(print");
}

#[test]
fn works_over_any_char_iterator() {
    let source: Vec<char> = "(+ 1)".chars().collect();
    let mut cursor = Cursor::new(source.into_iter());
    assert_eq!(cursor.advance(), Some('('));
    assert_eq!(cursor.peek(), Some('+'));
}
