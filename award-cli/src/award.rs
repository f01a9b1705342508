//! Award categories, kinds and the records the generator produces

use chrono::NaiveDate;

use crate::ledger::Cell;

/// A closed set of values the operator picks with a one-letter token
pub trait Choice: Copy + Sized + 'static {
    /// What the operator is choosing, used in prompts
    const LABEL: &'static str;
    /// Accepted tokens, in the order they are offered
    const OPTIONS: &'static [(&'static str, Self)];

    /// Parse operator input; case-insensitive, surrounding whitespace ignored
    fn parse_token(input: &str) -> Option<Self> {
        let token = input.trim().to_lowercase();
        Self::OPTIONS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, value)| *value)
    }

    /// Accepted tokens joined for display, e.g. "b, s, g"
    fn tokens() -> String {
        Self::OPTIONS
            .iter()
            .map(|(t, _)| *t)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Award colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Bronze,
    Silver,
    Gold,
}

impl Category {
    /// Capitalized name, also the template directory name
    pub fn name(&self) -> &'static str {
        match self {
            Category::Bronze => "Bronze",
            Category::Silver => "Silver",
            Category::Gold => "Gold",
        }
    }
}

impl Choice for Category {
    const LABEL: &'static str = "color";
    const OPTIONS: &'static [(&'static str, Self)] = &[
        ("b", Category::Bronze),
        ("s", Category::Silver),
        ("g", Category::Gold),
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Whether the award went to an activator or a hunter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Activator,
    Hunter,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Activator => "Activator",
            Kind::Hunter => "Hunter",
        }
    }
}

impl Choice for Kind {
    const LABEL: &'static str = "type";
    const OPTIONS: &'static [(&'static str, Self)] =
        &[("a", Kind::Activator), ("h", Kind::Hunter)];
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Everything needed to produce one certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    pub category: Category,
    pub kind: Kind,
    pub name: String,
    pub serial_number: String,
    pub date: NaiveDate,
}

impl CertificateRequest {
    /// Date as printed on the certificate
    pub fn date_text(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Template file stem, e.g. "GoldActivator"
    pub fn template_stem(&self) -> String {
        format!("{}{}", self.category.name(), self.kind.name())
    }

    /// Exported document file name, e.g. "42_gold_activator_Erwin---PA3EFR.pdf"
    pub fn certificate_file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}.pdf",
            sanitize_name(&self.serial_number),
            self.category.name().to_lowercase(),
            self.kind.name().to_lowercase(),
            sanitize_name(&self.name)
        )
    }

    pub fn into_record(self) -> AwardRecord {
        let certificate_file_name = Some(self.certificate_file_name());
        AwardRecord {
            category: self.category,
            kind: self.kind,
            name: self.name,
            serial_number: self.serial_number,
            certificate_file_name,
        }
    }
}

/// Replace characters that would break the output path
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '-',
            other => other,
        })
        .collect()
}

/// One ledger row as written by the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardRecord {
    pub category: Category,
    pub kind: Kind,
    pub name: String,
    pub serial_number: String,
    pub certificate_file_name: Option<String>,
}

impl AwardRecord {
    /// Positional ledger row: Color, Type, Name, Number, Certificate
    pub fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.category.name().to_string()),
            Cell::Text(self.kind.name().to_string()),
            Cell::Text(self.name.clone()),
            Cell::Text(self.serial_number.clone()),
            self.certificate_file_name
                .as_ref()
                .map(|f| Cell::Text(f.clone()))
                .unwrap_or(Cell::Empty),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn erwin() -> CertificateRequest {
        CertificateRequest {
            category: Category::Gold,
            kind: Kind::Activator,
            name: "Erwin - PA3EFR".to_string(),
            serial_number: "42".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        }
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!(Category::parse_token("g"), Some(Category::Gold));
        assert_eq!(Category::parse_token("  B "), Some(Category::Bronze));
        assert_eq!(Category::parse_token("x"), None);
        assert_eq!(Category::parse_token("gold"), None);
        assert_eq!(Kind::parse_token("H"), Some(Kind::Hunter));
        assert_eq!(Kind::parse_token(""), None);
    }

    #[test]
    fn test_tokens_listing() {
        assert_eq!(Category::tokens(), "b, s, g");
        assert_eq!(Kind::tokens(), "a, h");
    }

    #[test]
    fn test_certificate_file_name() {
        let request = erwin();
        assert_eq!(request.template_stem(), "GoldActivator");
        assert_eq!(
            request.certificate_file_name(),
            "42_gold_activator_Erwin---PA3EFR.pdf"
        );
        assert_eq!(request.date_text(), "2024-03-09");
    }

    #[test]
    fn test_serial_with_separators_stays_in_one_file_name() {
        let request = CertificateRequest {
            serial_number: "12/3".to_string(),
            ..erwin()
        };
        let file_name = request.certificate_file_name();
        assert_eq!(file_name, "12-3_gold_activator_Erwin---PA3EFR.pdf");
        assert!(!file_name.contains('/'));

        // The ledger keeps the serial as entered.
        assert_eq!(request.into_record().serial_number, "12/3");
    }

    #[test]
    fn test_sanitize_replaces_separators() {
        assert_eq!(sanitize_name("a b/c\\d"), "a-b-c-d");
        assert_eq!(sanitize_name("PA3EFR"), "PA3EFR");
    }

    #[test]
    fn test_record_row_is_positional() {
        let row = erwin().into_record().to_row();
        assert_eq!(
            row,
            vec![
                Cell::Text("Gold".to_string()),
                Cell::Text("Activator".to_string()),
                Cell::Text("Erwin - PA3EFR".to_string()),
                Cell::Text("42".to_string()),
                Cell::Text("42_gold_activator_Erwin---PA3EFR.pdf".to_string()),
            ]
        );
    }
}
