use super::*;

use proptest::prelude::*;

fn mono(s: &str) -> f64 {
    s.chars().count() as f64 * 10.0
}

#[test]
fn wraps_greedily_at_width() {
    let lines = wrap_text("the quick brown fox jumps", 110.0, mono);
    assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
}

#[test]
fn overlong_word_gets_its_own_line() {
    let lines = wrap_text("a supercalifragilistic b", 50.0, mono);
    assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
}

#[test]
fn blank_text_has_no_lines() {
    assert!(wrap_text("", 100.0, mono).is_empty());
    assert!(wrap_text("   ", 100.0, mono).is_empty());
}

#[test]
fn block_is_centred_on_anchor() {
    assert_eq!(centered_block_start(400.0, 1, 80.0), 400.0);
    assert_eq!(centered_block_start(400.0, 2, 80.0), 360.0);
    assert_eq!(block_line_centers(400.0, 3, 80.0), vec![320.0, 400.0, 480.0]);
}

proptest! {
    #[test]
    fn wrap_preserves_words_and_width(
        words in proptest::collection::vec("[a-z]{1,8}", 0..30),
        extra in 0usize..60,
    ) {
        let text = words.join(" ");
        let max_width = 80.0 + extra as f64 * 10.0;
        let lines = wrap_text(&text, max_width, mono);

        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
        prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
        for line in &lines {
            prop_assert!(mono(line) <= max_width);
        }
    }
}
