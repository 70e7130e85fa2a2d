use crate::domain::errors::ValuationError;
use crate::domain::valuation::sales::{SaleRecord, SalesTable};

/// Ordered list of feature names.
/// The order MUST match `FeatureVector::as_slice`; changing it invalidates trained models.
pub const FEATURE_NAMES: &[&str] = &[
    "name_length",
    "digit_ratio",
    "hyphen_ratio",
    "vowel_ratio",
    "letter_ratio",
    "longest_consonant_run",
    "has_digit",
    "has_hyphen",
    "tld_com",
    "tld_net",
    "tld_org",
    "tld_ai",
    "tld_io",
    "tld_co",
    "tld_other",
];

/// TLDs with a dedicated one-hot column; everything else lands in `tld_other`.
const KNOWN_TLDS: &[&str] = &["com", "net", "org", "ai", "io", "co"];

const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Featurize a (name, tld) pair. Both parts are lowercased; a leading dot on the TLD is ignored.
    pub fn from_name_tld(name: &str, tld: &str) -> Result<Self, ValuationError> {
        let name = normalize_label(name);
        let tld = tld.trim().trim_start_matches('.').to_ascii_lowercase();
        let input = format!("{}.{}", name, tld);

        validate_label(&name).map_err(|reason| ValuationError::Estimation {
            input: input.clone(),
            reason: format!("name {}", reason),
        })?;
        if tld.is_empty() {
            return Err(ValuationError::Estimation {
                input,
                reason: "empty TLD".to_string(),
            });
        }
        for label in tld.split('.') {
            validate_label(label).map_err(|reason| ValuationError::Estimation {
                input: input.clone(),
                reason: format!("TLD {}", reason),
            })?;
        }

        Ok(Self::compute(&name, &tld))
    }

    /// Featurize a full domain such as `example.com` or `brand.co.uk`.
    pub fn from_domain(domain: &str) -> Result<Self, ValuationError> {
        let (name, tld) = split_domain(domain)?;
        Self::from_name_tld(name, tld)
    }

    fn compute(name: &str, tld: &str) -> Self {
        let len = name.chars().count() as f64;
        let digits = name.chars().filter(|c| c.is_ascii_digit()).count() as f64;
        let hyphens = name.chars().filter(|&c| c == '-').count() as f64;
        let letters = name.chars().filter(|c| c.is_ascii_alphabetic()).count() as f64;
        let vowels = name.chars().filter(|c| is_vowel(*c)).count() as f64;

        let mut values = vec![
            len,
            digits / len,
            hyphens / len,
            vowels / len,
            letters / len,
            longest_consonant_run(name) as f64,
            if digits > 0.0 { 1.0 } else { 0.0 },
            if hyphens > 0.0 { 1.0 } else { 0.0 },
        ];

        let known = KNOWN_TLDS.iter().position(|&t| t == tld);
        for i in 0..KNOWN_TLDS.len() {
            values.push(if known == Some(i) { 1.0 } else { 0.0 });
        }
        values.push(if known.is_none() { 1.0 } else { 0.0 });

        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.clone()
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&f| f == feature)
            .and_then(|i| self.0.get(i).copied())
    }
}

/// Split `name.tld` at the first dot.
pub fn split_domain(domain: &str) -> Result<(&str, &str), ValuationError> {
    let trimmed = domain.trim().trim_end_matches('.');
    match trimmed.split_once('.') {
        Some((name, tld)) if !name.is_empty() && !tld.is_empty() => Ok((name, tld)),
        _ => Err(ValuationError::Estimation {
            input: domain.to_string(),
            reason: "expected <name>.<tld>".to_string(),
        }),
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_ascii_lowercase()
}

fn validate_label(label: &str) -> Result<(), String> {
    if label.is_empty() {
        return Err("is empty".to_string());
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(format!("longer than {} characters", MAX_LABEL_LEN));
    }
    if let Some(c) = label
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(format!("contains invalid character '{}'", c));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err("starts or ends with a hyphen".to_string());
    }
    Ok(())
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn longest_consonant_run(name: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in name.chars() {
        if c.is_ascii_alphabetic() && !is_vowel(c) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Sale rows paired with their features
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    pub rows: Vec<(SaleRecord, FeatureVector)>,
    /// Rows that could not be featurized
    pub skipped: usize,
    /// Rows the loader already dropped
    pub load_skipped: usize,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn features(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|(_, f)| f.to_vec()).collect()
    }

    /// Rows dropped anywhere between the CSV file and this table
    pub fn total_skipped(&self) -> usize {
        self.skipped + self.load_skipped
    }

    pub fn prices(&self) -> Vec<f64> {
        self.rows.iter().map(|(r, _)| r.price).collect()
    }
}

/// Featurize every row of the table, skipping rows with an unusable domain or price.
pub fn extract_features(table: &SalesTable) -> FeatureTable {
    let mut out = FeatureTable {
        rows: Vec::with_capacity(table.len()),
        skipped: 0,
        load_skipped: table.skipped_rows,
    };

    for record in &table.records {
        if !record.price.is_finite() || record.price < 0.0 {
            out.skipped += 1;
            continue;
        }
        match FeatureVector::from_domain(&record.domain) {
            Ok(features) => out.rows.push((record.clone(), features)),
            Err(_) => out.skipped += 1,
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    #[test]
    fn test_feature_vector_length() {
        let fv = FeatureVector::from_name_tld("example", "com").unwrap();
        assert_eq!(fv.as_slice().len(), FEATURE_NAMES.len());
    }

    #[test]
    fn test_character_composition() {
        let fv = FeatureVector::from_name_tld("ab-12", "io").unwrap();
        assert_eq!(fv.get("name_length"), Some(5.0));
        assert_eq!(fv.get("digit_ratio"), Some(0.4));
        assert_eq!(fv.get("hyphen_ratio"), Some(0.2));
        assert_eq!(fv.get("has_digit"), Some(1.0));
        assert_eq!(fv.get("tld_io"), Some(1.0));
        assert_eq!(fv.get("tld_other"), Some(0.0));
    }

    #[test]
    fn test_unknown_tld_goes_to_other() {
        let fv = FeatureVector::from_name_tld("brand", ".XYZ").unwrap();
        assert_eq!(fv.get("tld_other"), Some(1.0));
        assert_eq!(fv.get("tld_com"), Some(0.0));
    }

    #[test]
    fn test_consonant_run() {
        let fv = FeatureVector::from_name_tld("strength", "com").unwrap();
        // "ngth"
        assert_eq!(fv.get("longest_consonant_run"), Some(4.0));
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(FeatureVector::from_name_tld("", "com").is_err());
        assert!(FeatureVector::from_name_tld("bad_name", "com").is_err());
        assert!(FeatureVector::from_name_tld("-brand", "com").is_err());
        assert!(FeatureVector::from_name_tld("brand", "").is_err());
        assert!(FeatureVector::from_name_tld("brand", "c*m").is_err());
    }

    #[test]
    fn test_domain_and_pair_agree() {
        let a = FeatureVector::from_domain("Example.COM").unwrap();
        let b = FeatureVector::from_name_tld("example", "com").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_extract_features_skips_malformed_rows() {
        let table = SalesTable::new(vec![
            SaleRecord::new("example.com", 1000.0, date()),
            SaleRecord::new("nodot", 500.0, date()),
            SaleRecord::new("negative.net", -5.0, date()),
            SaleRecord::new("in valid.org", 10.0, date()),
            SaleRecord::new("brand.ai", 2000.0, date()),
        ]);

        let features = extract_features(&table);
        assert_eq!(features.len(), 2);
        assert_eq!(features.skipped, 3);
        assert_eq!(features.total_skipped(), 3);
        assert_eq!(features.prices(), vec![1000.0, 2000.0]);
    }
}
