/// Uppercases the first character and leaves the rest untouched.
pub(crate) fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `garage_1_or_more` -> `Garage 1 Or More`
pub(crate) fn amenity_label(code: &str) -> String {
    code.split('_')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole numbers print without a fractional part.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub(crate) fn listing_title(beds: f64, kind: &str) -> String {
    format!("{}BR {}", format_number(beds), capitalize_first(kind))
}

pub(crate) fn monthly_price(amount: f64) -> String {
    format!("${}/mo", format_number(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amenity_codes_become_title_case_labels() {
        assert_eq!(amenity_label("central_air"), "Central Air");
        assert_eq!(amenity_label("garage_1_or_more"), "Garage 1 Or More");
        assert_eq!(amenity_label("ensuite"), "Ensuite");
        assert_eq!(amenity_label(""), "");
    }

    #[test]
    fn titles_and_prices_drop_trailing_zeroes() {
        assert_eq!(listing_title(2.0, "condos"), "2BR Condos");
        assert_eq!(listing_title(1.5, "single_family"), "1.5BR Single_family");
        assert_eq!(monthly_price(4000.0), "$4000/mo");
        assert_eq!(monthly_price(1249.5), "$1249.5/mo");
    }
}
