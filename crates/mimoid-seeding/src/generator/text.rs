//! Field-name-driven text synthesis.
//!
//! Picks a faker appropriate to the field's name so generated documents read
//! like real data ("email" fields get addresses, "city" fields get cities)
//! instead of uniform noise. Falls back to lorem words for anything
//! unrecognized.

use fake::Fake;
use fake::faker::address::en::{CityName, CountryName, StreetName, ZipCode};
use fake::faker::company::en::{CompanyName, Profession};
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Sentence, Word, Words};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;

/// Generates a string suited to the field's name.
pub(crate) fn string_for_field(field_name: &str, rng: &mut impl Rng) -> String {
	let name = field_name.to_ascii_lowercase();

	if name.contains("email") {
		SafeEmail().fake_with_rng(rng)
	} else if name.contains("first_name") {
		FirstName().fake_with_rng(rng)
	} else if name.contains("last_name") || name.contains("surname") {
		LastName().fake_with_rng(rng)
	} else if name.contains("username") || name.contains("login") {
		Username().fake_with_rng(rng)
	} else if name.contains("company") || name.contains("employer") || name.contains("organization")
	{
		CompanyName().fake_with_rng(rng)
	} else if name.contains("name") {
		Name().fake_with_rng(rng)
	} else if name.contains("phone") {
		PhoneNumber().fake_with_rng(rng)
	} else if name.contains("city") {
		CityName().fake_with_rng(rng)
	} else if name.contains("country") {
		CountryName().fake_with_rng(rng)
	} else if name.contains("street") || name.contains("address") {
		StreetName().fake_with_rng(rng)
	} else if name.contains("zip") || name.contains("postal") {
		ZipCode().fake_with_rng(rng)
	} else if name.contains("job") || name.contains("profession") || name.contains("role") {
		Profession().fake_with_rng(rng)
	} else if name.contains("description")
		|| name.contains("summary")
		|| name.contains("notes")
		|| name.contains("comment")
		|| name.contains("bio")
	{
		Sentence(5..12).fake_with_rng(rng)
	} else if name.contains("title") || name.contains("subject") {
		let words: Vec<String> = Words(2..5).fake_with_rng(rng);
		words.join(" ")
	} else if name.contains("url") || name.contains("website") {
		let host: String = Word().fake_with_rng(rng);
		format!("https://{host}.example.com")
	} else {
		let words: Vec<String> = Words(1..4).fake_with_rng(rng);
		words.join(" ")
	}
}

/// Fits `value` into the declared length bounds: truncates past `max_length`
/// (on a char boundary) and pads with random lowercase letters up to
/// `min_length`.
pub(crate) fn clamp_length(
	mut value: String,
	min_length: Option<usize>,
	max_length: Option<usize>,
	rng: &mut impl Rng,
) -> String {
	if let Some(max) = max_length {
		if value.chars().count() > max {
			value = value.chars().take(max).collect();
		}
	}
	if let Some(min) = min_length {
		let mut len = value.chars().count();
		while len < min {
			value.push(rng.gen_range(b'a'..=b'z') as char);
			len += 1;
		}
	}
	value
}

/// Embeds an ordinal into `value` so values of unique-indexed fields cannot
/// collide within a run. Email-shaped values keep their shape
/// (`local+NNN@domain`); everything else gets a numeric suffix. The suffix
/// survives `max_length` by truncating the base first.
pub(crate) fn uniquify(value: String, ordinal: u64, max_length: Option<usize>) -> String {
	let result = match value.split_once('@') {
		Some((local, domain)) => format!("{local}+{ordinal}@{domain}"),
		None => format!("{value}-{ordinal}"),
	};

	match max_length {
		Some(max) if result.chars().count() > max => {
			let suffix_len = result.chars().count() - value.chars().count();
			let keep = max.saturating_sub(suffix_len);
			let base: String = value.chars().take(keep).collect();
			match base.split_once('@') {
				Some((local, domain)) => format!("{local}+{ordinal}@{domain}"),
				None => format!("{base}-{ordinal}"),
			}
		}
		_ => result,
	}
}
