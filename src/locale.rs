use chrono::{Month, Weekday};
use phf::{phf_map, phf_set};
use serde_with::DeserializeFromStr;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};
use crate::week::WeekNumberRule;

/// Translations and date patterns of one language.
#[derive(Debug)]
pub struct LocaleData {
    pub months: [&'static str; 12],
    pub short_months: [&'static str; 12],
    /// Short weekday names, Monday first.
    pub weekdays: [&'static str; 7],
    pub today: &'static str,
    pub clear: &'static str,
    pub date_format: &'static str,
    pub parse_formats: &'static [&'static str],
}

const ENGLISH: LocaleData = LocaleData {
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August",
        "September", "October", "November", "December",
    ],
    short_months: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekdays: ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"],
    today: "Today",
    clear: "Clear",
    date_format: "%-d %B %Y",
    parse_formats: &["%-d %B %Y", "%d %b %Y", "%d/%m/%Y", "%Y-%m-%d"],
};

static LOCALE_DATA: phf::Map<&'static str, LocaleData> = phf_map! {
    "en" => ENGLISH,
    "en-US" => LocaleData {
        date_format: "%B %-d, %Y",
        parse_formats: &["%B %-d, %Y", "%b %d, %Y", "%m/%d/%Y", "%Y-%m-%d"],
        ..ENGLISH
    },
    "de" => LocaleData {
        months: [
            "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August",
            "September", "Oktober", "November", "Dezember",
        ],
        short_months: [
            "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
        ],
        weekdays: ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"],
        today: "Heute",
        clear: "Löschen",
        date_format: "%d.%m.%Y",
        parse_formats: &["%d.%m.%Y", "%d.%m.%y", "%Y-%m-%d"],
    },
    "fr" => LocaleData {
        months: [
            "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
            "septembre", "octobre", "novembre", "décembre",
        ],
        short_months: [
            "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
            "nov.", "déc.",
        ],
        weekdays: ["lu", "ma", "me", "je", "ve", "sa", "di"],
        today: "Aujourd'hui",
        clear: "Effacer",
        date_format: "%d/%m/%Y",
        parse_formats: &["%d/%m/%Y", "%d/%m/%y", "%Y-%m-%d"],
    },
    "es" => LocaleData {
        months: [
            "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
            "septiembre", "octubre", "noviembre", "diciembre",
        ],
        short_months: [
            "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
        ],
        weekdays: ["lu", "ma", "mi", "ju", "vi", "sá", "do"],
        today: "Hoy",
        clear: "Borrar",
        date_format: "%d/%m/%Y",
        parse_formats: &["%d/%m/%Y", "%d/%m/%y", "%Y-%m-%d"],
    },
    "it" => LocaleData {
        months: [
            "gennaio", "febbraio", "marzo", "aprile", "maggio", "giugno", "luglio", "agosto",
            "settembre", "ottobre", "novembre", "dicembre",
        ],
        short_months: [
            "gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic",
        ],
        weekdays: ["lu", "ma", "me", "gi", "ve", "sa", "do"],
        today: "Oggi",
        clear: "Cancella",
        date_format: "%d/%m/%Y",
        parse_formats: &["%d/%m/%Y", "%d/%m/%y", "%Y-%m-%d"],
    },
    "nl" => LocaleData {
        months: [
            "januari", "februari", "maart", "april", "mei", "juni", "juli", "augustus",
            "september", "oktober", "november", "december",
        ],
        short_months: [
            "jan", "feb", "mrt", "apr", "mei", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
        ],
        weekdays: ["ma", "di", "wo", "do", "vr", "za", "zo"],
        today: "Vandaag",
        clear: "Wissen",
        date_format: "%d-%m-%Y",
        parse_formats: &["%d-%m-%Y", "%d-%m-%y", "%Y-%m-%d"],
    },
    "pt" => LocaleData {
        months: [
            "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto",
            "setembro", "outubro", "novembro", "dezembro",
        ],
        short_months: [
            "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
        ],
        weekdays: ["seg", "ter", "qua", "qui", "sex", "sáb", "dom"],
        today: "Hoje",
        clear: "Limpar",
        date_format: "%d/%m/%Y",
        parse_formats: &["%d/%m/%Y", "%d/%m/%y", "%Y-%m-%d"],
    },
    "sv" => LocaleData {
        months: [
            "januari", "februari", "mars", "april", "maj", "juni", "juli", "augusti",
            "september", "oktober", "november", "december",
        ],
        short_months: [
            "jan", "feb", "mar", "apr", "maj", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
        ],
        weekdays: ["må", "ti", "on", "to", "fr", "lö", "sö"],
        today: "Idag",
        clear: "Rensa",
        date_format: "%Y-%m-%d",
        parse_formats: &["%Y-%m-%d", "%y-%m-%d"],
    },
    "da" => LocaleData {
        months: [
            "januar", "februar", "marts", "april", "maj", "juni", "juli", "august",
            "september", "oktober", "november", "december",
        ],
        short_months: [
            "jan", "feb", "mar", "apr", "maj", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
        ],
        weekdays: ["ma", "ti", "on", "to", "fr", "lø", "sø"],
        today: "I dag",
        clear: "Ryd",
        date_format: "%d.%m.%Y",
        parse_formats: &["%d.%m.%Y", "%d.%m.%y", "%Y-%m-%d"],
    },
    "nb" => LocaleData {
        months: [
            "januar", "februar", "mars", "april", "mai", "juni", "juli", "august",
            "september", "oktober", "november", "desember",
        ],
        short_months: [
            "jan", "feb", "mar", "apr", "mai", "jun", "jul", "aug", "sep", "okt", "nov", "des",
        ],
        weekdays: ["ma", "ti", "on", "to", "fr", "lø", "sø"],
        today: "I dag",
        clear: "Tøm",
        date_format: "%d.%m.%Y",
        parse_formats: &["%d.%m.%Y", "%d.%m.%y", "%Y-%m-%d"],
    },
    "fi" => LocaleData {
        months: [
            "tammikuu", "helmikuu", "maaliskuu", "huhtikuu", "toukokuu", "kesäkuu",
            "heinäkuu", "elokuu", "syyskuu", "lokakuu", "marraskuu", "joulukuu",
        ],
        short_months: [
            "tammi", "helmi", "maalis", "huhti", "touko", "kesä", "heinä", "elo", "syys",
            "loka", "marras", "joulu",
        ],
        weekdays: ["ma", "ti", "ke", "to", "pe", "la", "su"],
        today: "Tänään",
        clear: "Tyhjennä",
        date_format: "%-d.%-m.%Y",
        parse_formats: &["%d.%m.%Y", "%Y-%m-%d"],
    },
    "pl" => LocaleData {
        months: [
            "styczeń", "luty", "marzec", "kwiecień", "maj", "czerwiec", "lipiec", "sierpień",
            "wrzesień", "październik", "listopad", "grudzień",
        ],
        short_months: [
            "sty", "lut", "mar", "kwi", "maj", "cze", "lip", "sie", "wrz", "paź", "lis", "gru",
        ],
        weekdays: ["pn", "wt", "śr", "cz", "pt", "so", "nd"],
        today: "Dzisiaj",
        clear: "Wyczyść",
        date_format: "%d.%m.%Y",
        parse_formats: &["%d.%m.%Y", "%d.%m.%y", "%Y-%m-%d"],
    },
};

static SUNDAY_FIRST_REGIONS: phf::Set<&'static str> = phf_set! {
    "US", "CA", "JP", "BR", "MX", "IL", "IN", "KR", "PH", "TW", "HK", "ZA", "SA", "PE",
    "CO", "VE", "GT", "HN", "NI", "PA", "PR", "DO", "SV", "BZ", "TH", "KH", "LA", "MO",
    "SG", "ZW", "KE", "ET", "PK", "BD", "NP", "MM", "ID", "BT", "AS", "GU", "UM", "VI",
};

static SATURDAY_FIRST_REGIONS: phf::Set<&'static str> = phf_set! {
    "AE", "AF", "BH", "DJ", "DZ", "EG", "IQ", "IR", "JO", "KW", "LY", "OM", "QA", "SD",
    "SY",
};

/// Regions whose first week of the year needs four days (ISO-8601).
static ISO_WEEK_REGIONS: phf::Set<&'static str> = phf_set! {
    "AD", "AN", "AT", "AX", "BE", "BG", "CH", "CZ", "DE", "DK", "EE", "ES", "FI", "FJ",
    "FO", "FR", "GB", "GF", "GG", "GI", "GP", "GR", "HU", "IE", "IM", "IS", "IT", "JE",
    "LI", "LT", "LU", "MC", "MQ", "NL", "NO", "PL", "RE", "RU", "SE", "SJ", "SK", "SM",
    "VA",
};

#[derive(Debug, Clone, PartialEq, Eq, DeserializeFromStr)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    pub fn new(language: &str, region: Option<&str>) -> Self {
        Locale {
            language: language.to_ascii_lowercase(),
            region: region.map(|r| r.to_ascii_uppercase()),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Translations for this locale, falling back to the language and then to
    /// English.
    pub fn data(&self) -> &'static LocaleData {
        LOCALE_DATA
            .get(self.to_string().as_str())
            .or_else(|| LOCALE_DATA.get(self.language.as_str()))
            .unwrap_or(&ENGLISH)
    }

    pub fn first_day_of_week(&self) -> Weekday {
        match self.region() {
            Some(region) if SUNDAY_FIRST_REGIONS.contains(region) => Weekday::Sun,
            Some(region) if SATURDAY_FIRST_REGIONS.contains(region) => Weekday::Sat,
            _ => Weekday::Mon,
        }
    }

    pub fn minimal_days_in_first_week(&self) -> u8 {
        match self.region() {
            Some(region) if ISO_WEEK_REGIONS.contains(region) => 4,
            _ => 1,
        }
    }

    pub fn week_number_rule(&self) -> WeekNumberRule {
        WeekNumberRule::new(self.first_day_of_week(), self.minimal_days_in_first_week())
    }

    pub fn month_name(&self, month: Month) -> &'static str {
        self.data().months[month.number_from_month() as usize - 1]
    }

    pub fn weekday_name(&self, weekday: Weekday) -> &'static str {
        self.data().weekdays[weekday.num_days_from_monday() as usize]
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::new("en", Some("US"))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => write!(f, "{}", self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = Error;

    /// Accepts `en`, `en-US`, `en_US` and POSIX forms like `de_DE.UTF-8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.split(|c| c == '.' || c == '@').next().unwrap_or("");
        let mut parts = tag.split(|c| c == '-' || c == '_');

        let language = parts.next().unwrap_or("");
        let region = parts.next();

        let language_ok = (2..=3).contains(&language.len())
            && language.chars().all(|c| c.is_ascii_alphabetic());
        let region_ok = region.map_or(true, |r| {
            (r.len() == 2 && r.chars().all(|c| c.is_ascii_alphabetic()))
                || (r.len() == 3 && r.chars().all(|c| c.is_ascii_digit()))
        });

        if !language_ok || !region_ok {
            return Err(Error::new(
                ErrorKind::LocaleParse,
                &format!("Locale '{}' not recognized", s),
            ));
        }

        Ok(Locale::new(language, region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_locale_forms() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::new("en", None));
        assert_eq!("en-us".parse::<Locale>().unwrap(), Locale::new("en", Some("US")));
        assert_eq!("de_DE.UTF-8".parse::<Locale>().unwrap(), Locale::new("de", Some("DE")));
        assert_eq!("es-419".parse::<Locale>().unwrap().region(), Some("419"));
        assert!("".parse::<Locale>().is_err());
        assert!("english".parse::<Locale>().is_err());
        assert!("en-USA".parse::<Locale>().is_err());
    }

    #[test]
    fn region_week_conventions() {
        let us = Locale::new("en", Some("US"));
        assert_eq!(us.week_number_rule(), WeekNumberRule::SUNDAY_START);

        let de = Locale::new("de", Some("DE"));
        assert_eq!(de.week_number_rule(), WeekNumberRule::ISO);

        let eg = Locale::new("ar", Some("EG"));
        assert_eq!(eg.first_day_of_week(), Weekday::Sat);

        let plain = Locale::new("fr", None);
        assert_eq!(plain.week_number_rule(), WeekNumberRule::new(Weekday::Mon, 1));
    }

    #[test]
    fn translations_fall_back() {
        assert_eq!(Locale::new("de", Some("AT")).month_name(Month::March), "März");
        assert_eq!(Locale::new("en", Some("US")).data().date_format, "%B %-d, %Y");
        assert_eq!(Locale::new("en", Some("GB")).data().date_format, "%-d %B %Y");
        assert_eq!(Locale::new("xx", None).weekday_name(Weekday::Sun), "Su");
    }
}
