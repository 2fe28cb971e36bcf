//! Locales and the label set used for display text.

use std::fmt;
use std::str::FromStr;

use carmarket_search::FilterGroup;
use serde::{Deserialize, Serialize};

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "ar" | "arabic" => Ok(Locale::Ar),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}

/// Strings used to render filter summaries.
///
/// `from`, `up_to` and `active_count` are templates; `{value}` and `{count}`
/// are substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub make_model: String,
    pub price: String,
    pub year: String,
    pub mileage: String,
    pub transmission: String,
    pub fuel_type: String,
    pub body_style: String,
    pub seller_type: String,
    pub location: String,
    pub all_filters: String,
    pub from: String,
    pub up_to: String,
    pub active_count: String,
    pub range_separator: String,
    pub group_separator: String,
    pub list_separator: String,
    pub thousands_separator: String,
    pub currency_symbol: String,
    pub mileage_unit: String,
}

impl Labels {
    pub fn english() -> Self {
        Self {
            make_model: "Make & Model".to_string(),
            price: "Price".to_string(),
            year: "Year".to_string(),
            mileage: "Mileage".to_string(),
            transmission: "Transmission".to_string(),
            fuel_type: "Fuel Type".to_string(),
            body_style: "Body Style".to_string(),
            seller_type: "Seller Type".to_string(),
            location: "Location".to_string(),
            all_filters: "All Filters".to_string(),
            from: "From {value}".to_string(),
            up_to: "Up to {value}".to_string(),
            active_count: "{count} filters".to_string(),
            range_separator: " - ".to_string(),
            group_separator: " - ".to_string(),
            list_separator: ", ".to_string(),
            thousands_separator: ",".to_string(),
            currency_symbol: "$".to_string(),
            mileage_unit: "km".to_string(),
        }
    }

    pub fn arabic() -> Self {
        Self {
            make_model: "الماركة والموديل".to_string(),
            price: "السعر".to_string(),
            year: "سنة الصنع".to_string(),
            mileage: "المسافة المقطوعة".to_string(),
            transmission: "ناقل الحركة".to_string(),
            fuel_type: "نوع الوقود".to_string(),
            body_style: "نوع الهيكل".to_string(),
            seller_type: "نوع البائع".to_string(),
            location: "الموقع".to_string(),
            all_filters: "جميع الفلاتر".to_string(),
            from: "من {value}".to_string(),
            up_to: "حتى {value}".to_string(),
            active_count: "{count} فلاتر".to_string(),
            range_separator: " - ".to_string(),
            group_separator: " - ".to_string(),
            list_separator: "، ".to_string(),
            thousands_separator: ",".to_string(),
            currency_symbol: "$".to_string(),
            mileage_unit: "كم".to_string(),
        }
    }

    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self::english(),
            Locale::Ar => Self::arabic(),
        }
    }

    /// Neutral label shown when a group is inactive.
    pub fn placeholder(&self, group: FilterGroup) -> &str {
        match group {
            FilterGroup::MakeModel => &self.make_model,
            FilterGroup::Price => &self.price,
            FilterGroup::Year => &self.year,
            FilterGroup::Mileage => &self.mileage,
            FilterGroup::Transmission => &self.transmission,
            FilterGroup::FuelType => &self.fuel_type,
            FilterGroup::BodyStyle => &self.body_style,
            FilterGroup::SellerType => &self.seller_type,
            FilterGroup::Location => &self.location,
            FilterGroup::AllFilters => &self.all_filters,
        }
    }

    pub fn from_value(&self, value: &str) -> String {
        self.from.replace("{value}", value)
    }

    pub fn up_to_value(&self, value: &str) -> String {
        self.up_to.replace("{value}", value)
    }

    pub fn count(&self, count: usize) -> String {
        self.active_count.replace("{count}", &count.to_string())
    }

    /// Group the digits of a number with this locale's separator.
    pub fn grouped(&self, value: f64) -> String {
        format_grouped(value, &self.thousands_separator)
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::english()
    }
}

/// Insert `separator` between every three integer digits.
///
/// Fractional digits are kept as `f64`'s `Display` prints them.
pub fn format_grouped(value: f64, separator: &str) -> String {
    let text = value.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + whole.len() / 3 * separator.len());
    if value < 0.0 {
        grouped.push('-');
    }
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(50000.0, ","), "50,000");
        assert_eq!(format_grouped(999.0, ","), "999");
        assert_eq!(format_grouped(1234567.0, ","), "1,234,567");
        assert_eq!(format_grouped(1500.5, ","), "1,500.5");
        assert_eq!(format_grouped(-2500.0, "."), "-2.500");
        assert_eq!(format_grouped(0.0, ","), "0");
    }

    #[test]
    fn test_templates() {
        let labels = Labels::english();
        assert_eq!(labels.from_value("$5,000"), "From $5,000");
        assert_eq!(labels.up_to_value("2020"), "Up to 2020");
        assert_eq!(labels.count(3), "3 filters");
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("AR".parse::<Locale>(), Ok(Locale::Ar));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_every_group_has_placeholder() {
        for labels in [Labels::english(), Labels::arabic()] {
            for group in FilterGroup::ALL {
                assert!(!labels.placeholder(group).is_empty());
            }
        }
    }
}
