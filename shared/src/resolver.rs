/// The third path segment of `/movies/{movieId}/reviews/{x}` is
/// ambiguous: a strict 4-digit value is a year, anything else is a
/// reviewer name. Every route that accepts the ambiguous segment must
/// classify it here so the interpretation never drifts between
/// handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewQuery {
    Year(String),
    Reviewer(String),
}

pub fn classify(third_param: &str) -> ReviewQuery {
    if third_param.len() == 4 && third_param.bytes().all(|b| b.is_ascii_digit()) {
        ReviewQuery::Year(third_param.to_string())
    } else {
        ReviewQuery::Reviewer(third_param.to_string())
    }
}

/// Inclusive reviewDate bounds for a year. Lexical BETWEEN on these is
/// correct only because stored dates are zero-padded `YYYY-MM-DD`.
pub fn year_bounds(year: &str) -> (String, String) {
    (format!("{year}-01-01"), format!("{year}-12-31"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_digits_is_a_year() {
        assert_eq!(classify("2021"), ReviewQuery::Year("2021".to_string()));
        assert_eq!(classify("0001"), ReviewQuery::Year("0001".to_string()));
        assert_eq!(classify("9999"), ReviewQuery::Year("9999".to_string()));
    }

    #[test]
    fn anything_else_is_a_reviewer() {
        assert_eq!(classify("bob"), ReviewQuery::Reviewer("bob".to_string()));
        // no partial-year handling
        assert_eq!(classify("202"), ReviewQuery::Reviewer("202".to_string()));
        assert_eq!(classify("20211"), ReviewQuery::Reviewer("20211".to_string()));
        assert_eq!(classify("202a"), ReviewQuery::Reviewer("202a".to_string()));
        // non-ascii digits do not count as a year
        assert_eq!(classify("٢٠٢١"), ReviewQuery::Reviewer("٢٠٢١".to_string()));
    }

    #[test]
    fn no_case_normalization() {
        assert_eq!(classify("Bob"), ReviewQuery::Reviewer("Bob".to_string()));
    }

    #[test]
    fn year_bounds_cover_the_whole_year() {
        let (start, end) = year_bounds("2021");
        assert_eq!(start, "2021-01-01");
        assert_eq!(end, "2021-12-31");
        assert!(start.as_str() <= "2021-05-01" && "2021-05-01" <= end.as_str());
        assert!("2022-01-10" > end.as_str());
    }
}
