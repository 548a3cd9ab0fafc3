//! Subset regex synthesis for pattern-constrained string fields.
//!
//! Schema authors constrain strings with simple patterns (`^[A-Z]{3}-[0-9]{4}$`
//! style account numbers, SKU codes, locale tags). This module synthesizes
//! matching values for that subset: literals, escapes (`\d`, `\w`, `\s`),
//! character classes with ranges, and the quantifiers `{n}`, `{n,m}`, `+`,
//! `*`, `?`. Anchors are ignored. Groups and alternation are not supported;
//! [`synthesize`] returns `None` for those and the caller falls back to
//! unconstrained text.

use rand::Rng;

const DIGITS: &str = "0123456789";
const WORD: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// One sampleable unit of the pattern.
enum Token {
	Literal(char),
	OneOf(Vec<char>),
}

impl Token {
	fn sample(&self, rng: &mut impl Rng) -> char {
		match self {
			Self::Literal(c) => *c,
			Self::OneOf(choices) => choices[rng.gen_range(0..choices.len())],
		}
	}
}

/// Produces a string matching `pattern`, or `None` if the pattern uses
/// constructs outside the supported subset.
pub(crate) fn synthesize(pattern: &str, rng: &mut impl Rng) -> Option<String> {
	let mut out = String::new();
	let mut chars = pattern.chars().peekable();

	while let Some(c) = chars.next() {
		let token = match c {
			'^' | '$' => continue,
			'(' | ')' | '|' => return None,
			'\\' => match chars.next()? {
				'd' => Token::OneOf(DIGITS.chars().collect()),
				'w' => Token::OneOf(WORD.chars().collect()),
				's' => Token::Literal(' '),
				escaped => Token::Literal(escaped),
			},
			'[' => Token::OneOf(parse_class(&mut chars)?),
			'.' => Token::OneOf(WORD.chars().collect()),
			'{' | '}' | '*' | '+' | '?' => return None,
			literal => Token::Literal(literal),
		};

		let (min, max) = parse_quantifier(&mut chars)?;
		let repeats = if min == max {
			min
		} else {
			rng.gen_range(min..=max)
		};
		for _ in 0..repeats {
			out.push(token.sample(rng));
		}
	}

	Some(out)
}

/// Parses a `[...]` character class body (the `[` is already consumed).
fn parse_class(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<Vec<char>> {
	let mut members = Vec::new();
	let mut prev: Option<char> = None;

	loop {
		let c = chars.next()?;
		match c {
			']' => break,
			'^' if members.is_empty() && prev.is_none() => return None,
			'\\' => {
				match chars.next()? {
					'd' => members.extend(DIGITS.chars()),
					'w' => members.extend(WORD.chars()),
					escaped => {
						members.push(escaped);
						prev = Some(escaped);
						continue;
					}
				}
				prev = None;
			}
			'-' => {
				// Range if a start exists and an end follows; literal otherwise.
				let start = match prev {
					Some(start) => start,
					None => {
						members.push('-');
						continue;
					}
				};
				match chars.peek() {
					Some(']') | None => members.push('-'),
					Some(_) => {
						let end = chars.next()?;
						if end < start {
							return None;
						}
						members.extend((start..=end).skip(1));
					}
				}
				prev = None;
			}
			member => {
				members.push(member);
				prev = Some(member);
			}
		}
	}

	if members.is_empty() { None } else { Some(members) }
}

/// Parses an optional quantifier after a token; returns the repeat bounds.
fn parse_quantifier(
	chars: &mut std::iter::Peekable<std::str::Chars>,
) -> Option<(usize, usize)> {
	match chars.peek() {
		Some('{') => {
			chars.next();
			let mut body = String::new();
			loop {
				match chars.next()? {
					'}' => break,
					c => body.push(c),
				}
			}
			match body.split_once(',') {
				Some((min, max)) => {
					let min = min.trim().parse().ok()?;
					let max = max.trim().parse().ok()?;
					if max < min {
						return None;
					}
					Some((min, max))
				}
				None => {
					let n = body.trim().parse().ok()?;
					Some((n, n))
				}
			}
		}
		Some('+') => {
			chars.next();
			Some((1, 3))
		}
		Some('*') => {
			chars.next();
			Some((0, 3))
		}
		Some('?') => {
			chars.next();
			Some((0, 1))
		}
		_ => Some((1, 1)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use regex::Regex;
	use rstest::rstest;

	fn rng() -> StdRng {
		StdRng::seed_from_u64(7)
	}

	#[rstest]
	#[case(r"^[A-Z]{3}-[0-9]{4}$")]
	#[case(r"\d{2,5}")]
	#[case(r"[a-z]+@example\.com")]
	#[case(r"SKU-\w{6}")]
	#[case(r"v\d+\.\d+")]
	#[case(r"[0-9a-f]{8}")]
	fn test_synthesized_value_matches_pattern(#[case] pattern: &str) {
		let mut rng = rng();
		let re = Regex::new(pattern).unwrap();
		for _ in 0..50 {
			let value = synthesize(pattern, &mut rng).unwrap();
			assert!(re.is_match(&value), "'{value}' does not match {pattern}");
		}
	}

	#[rstest]
	#[case(r"(a|b)")]
	#[case(r"a|b")]
	#[case(r"[^abc]")]
	fn test_unsupported_constructs_return_none(#[case] pattern: &str) {
		assert!(synthesize(pattern, &mut rng()).is_none());
	}

	#[rstest]
	fn test_optional_token_can_be_absent() {
		let mut rng = rng();
		let mut lengths = std::collections::HashSet::new();
		for _ in 0..50 {
			lengths.insert(synthesize(r"ab?", &mut rng).unwrap().len());
		}
		assert_eq!(lengths, [1, 2].into_iter().collect());
	}

	#[rstest]
	fn test_deterministic_with_same_seed() {
		let a = synthesize(r"[a-z]{8}", &mut StdRng::seed_from_u64(99)).unwrap();
		let b = synthesize(r"[a-z]{8}", &mut StdRng::seed_from_u64(99)).unwrap();
		assert_eq!(a, b);
	}
}
