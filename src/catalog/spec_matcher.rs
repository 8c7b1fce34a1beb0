use std::sync::LazyLock;

use regex::Regex;

static MEMORY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:(\d+)\s*x\s*)?(\d+)\s*GB\s*(\d+)\s*MHz").expect("memory value pattern")
});
static GRAPHICS_VRAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*GB").expect("graphics vram pattern"));
static GRAPHICS_MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)RTX\s*(\d+)").expect("graphics model pattern"));
static CAPACITY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)([GT])B").expect("capacity value pattern"));

const TRADEMARK_GLYPH: char = '®';

/// A parsed filter value for one specification dimension.
///
/// Each variant renders to a set of case-insensitive clauses that must all match the
/// stored string. Clauses only use syntax shared by PostgreSQL's `~*` operator and the
/// `regex` crate, so the same clauses can be checked in-process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecMatcher {
    /// `2x16GB 4800MHz` or `16GB 8533 MHz`.
    Memory {
        modules: Option<u32>,
        size_gb: u32,
        speed_mhz: u32,
    },
    /// `6GB RTX 4050`: both parts must appear, in any order.
    DiscreteGraphics { vram_gb: u32, model: u32 },
    /// `Intel® Iris® Xe`: words in order, any gap between them, ® optional.
    IntelGraphics { words: Vec<String> },
    /// `512GB`, `1TB`: storage slots.
    Capacity { amount: u64, unit: CapacityUnit },
    /// Whole-token match: the value must not run into further letters or digits.
    Token { value: String },
    /// Plain substring match; also the fallback for values that fail their pattern.
    Contains { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityUnit {
    Gigabytes,
    Terabytes,
}

impl CapacityUnit {
    fn suffix(self) -> &'static str {
        match self {
            CapacityUnit::Gigabytes => "GB",
            CapacityUnit::Terabytes => "TB",
        }
    }
}

impl SpecMatcher {
    pub fn memory(raw: &str) -> Self {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let parsed = MEMORY_VALUE.captures(&normalized).and_then(|caps| {
            let modules = match caps.get(1) {
                Some(m) => Some(m.as_str().parse::<u32>().ok()?),
                None => None,
            };
            let size_gb = caps.get(2)?.as_str().parse::<u32>().ok()?;
            let speed_mhz = caps.get(3)?.as_str().parse::<u32>().ok()?;
            Some(SpecMatcher::Memory {
                modules,
                size_gb,
                speed_mhz,
            })
        });
        parsed.unwrap_or_else(|| SpecMatcher::contains(raw))
    }

    pub fn graphics(raw: &str) -> Self {
        if raw.to_lowercase().contains("intel") {
            let words = raw.split_whitespace().map(str::to_string).collect();
            return SpecMatcher::IntelGraphics { words };
        }

        let vram_gb = capture_number::<u32>(&GRAPHICS_VRAM, raw);
        let model = capture_number::<u32>(&GRAPHICS_MODEL, raw);
        match (vram_gb, model) {
            (Some(vram_gb), Some(model)) => SpecMatcher::DiscreteGraphics { vram_gb, model },
            _ => SpecMatcher::contains(raw),
        }
    }

    pub fn capacity(raw: &str) -> Self {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let parsed = CAPACITY_VALUE.captures(&compact).and_then(|caps| {
            let amount = caps.get(1)?.as_str().parse::<u64>().ok()?;
            let unit = match caps.get(2)?.as_str() {
                "T" | "t" => CapacityUnit::Terabytes,
                _ => CapacityUnit::Gigabytes,
            };
            Some(SpecMatcher::Capacity { amount, unit })
        });
        parsed.unwrap_or_else(|| SpecMatcher::contains(raw))
    }

    pub fn token(raw: &str) -> Self {
        SpecMatcher::Token {
            value: raw.to_string(),
        }
    }

    pub fn contains(raw: &str) -> Self {
        SpecMatcher::Contains {
            value: raw.to_string(),
        }
    }

    /// Case-insensitive patterns that must all match the stored value.
    pub fn clauses(&self) -> Vec<String> {
        match self {
            SpecMatcher::Memory {
                modules: Some(modules),
                size_gb,
                speed_mhz,
            } => vec![format!(r"\({modules}x{size_gb}GB\).*{speed_mhz}\s*MHz")],
            SpecMatcher::Memory {
                modules: None,
                size_gb,
                speed_mhz,
            } => vec![format!(r"^{size_gb}GB[^(]*{speed_mhz}\s*MHz")],
            SpecMatcher::DiscreteGraphics { vram_gb, model } => vec![
                format!(r"(^|[^0-9]){vram_gb}\s*GB"),
                format!(r"RTX(.*[^0-9])?{model}([^0-9]|$)"),
            ],
            SpecMatcher::IntelGraphics { words } => {
                let pattern = words
                    .iter()
                    .map(|word| glyph_optional(word))
                    .collect::<Vec<_>>()
                    .join(".*");
                vec![pattern]
            }
            SpecMatcher::Capacity { amount, unit } => {
                vec![format!(r"(^|[^0-9]){amount}\s*{}", unit.suffix())]
            }
            SpecMatcher::Token { value } => {
                vec![format!(r"{}([^[:alnum:]]|$)", escape_pattern(value))]
            }
            SpecMatcher::Contains { value } => vec![escape_pattern(value)],
        }
    }

    /// Evaluate the clauses against a stored value in-process.
    #[cfg(test)]
    pub fn matches(&self, stored: &str) -> bool {
        self.compiled().iter().all(|re| re.is_match(stored))
    }

    #[cfg(test)]
    fn compiled(&self) -> Vec<Regex> {
        self.clauses()
            .iter()
            .map(|clause| {
                regex::RegexBuilder::new(clause)
                    .case_insensitive(true)
                    .build()
                    .unwrap_or_else(|err| panic!("clause {clause} does not compile: {err}"))
            })
            .collect()
    }
}

fn capture_number<T: std::str::FromStr>(re: &Regex, haystack: &str) -> Option<T> {
    re.captures(haystack)?.get(1)?.as_str().parse().ok()
}

fn glyph_optional(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 4);
    for ch in word.chars() {
        if ch == TRADEMARK_GLYPH {
            out.push(TRADEMARK_GLYPH);
            out.push('?');
        } else {
            push_escaped(&mut out, ch);
        }
    }
    out
}

/// Escape user input so it is matched literally.
pub fn escape_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 2);
    for ch in value.chars() {
        push_escaped(&mut out, ch);
    }
    out
}

fn push_escaped(out: &mut String, ch: char) {
    if matches!(
        ch,
        '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
    ) {
        out.push('\\');
    }
    out.push(ch);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_with_module_count_requires_it_literally() {
        let matcher = SpecMatcher::memory("2x16GB 4800MHz");
        assert_eq!(
            matcher,
            SpecMatcher::Memory {
                modules: Some(2),
                size_gb: 16,
                speed_mhz: 4800
            }
        );
        assert!(matcher.matches("(2x16GB) 4800 MHz"));
        assert!(matcher.matches("DDR5 (2x16GB) 4800MHz"));
        assert!(!matcher.matches("(2x8GB) 4800MHz"));
        assert!(!matcher.matches("(2x16GB) 5600MHz"));
    }

    #[test]
    fn memory_without_module_count_anchors_on_capacity() {
        let matcher = SpecMatcher::memory("  16GB   8533 MHz ");
        assert!(matches!(matcher, SpecMatcher::Memory { modules: None, .. }));
        assert!(matcher.matches("16GB LPDDR5X 8533MHz"));
        assert!(!matcher.matches("32GB (2x16GB) 8533MHz"));
        assert!(!matcher.matches("(1x16GB) 8533MHz"));
    }

    #[test]
    fn discrete_graphics_is_order_independent() {
        let matcher = SpecMatcher::graphics("6GB RTX 4050");
        assert_eq!(
            matcher,
            SpecMatcher::DiscreteGraphics {
                vram_gb: 6,
                model: 4050
            }
        );
        assert!(matcher.matches("RTX 4050 6GB GDDR6"));
        assert!(matcher.matches("Nvidia GeForce 6GB RTX4050"));
        assert!(!matcher.matches("8GB RTX 4060"));
        assert!(!matcher.matches("16GB RTX 4050"));
        assert!(!matcher.matches("6GB RTX 40500"));
        assert!(!matcher.matches("6GB RTX 14050"));
    }

    #[test]
    fn discrete_graphics_model_may_sit_anywhere_after_rtx() {
        let matcher = SpecMatcher::graphics("6GB RTX 4050");
        assert!(matcher.matches("NVIDIA® GeForce RTX™ 4050 6GB GDDR6"));
        assert!(matcher.matches("GeForce RTX Laptop 4050 6GB"));
        assert!(!matcher.matches("NVIDIA® GeForce RTX™ 4060 6GB GDDR6"));
        assert!(!matcher.matches("NVIDIA® GeForce 4050 6GB"));
    }

    #[test]
    fn intel_graphics_treats_trademark_glyph_as_optional() {
        let matcher = SpecMatcher::graphics("Intel® Iris® Xe");
        assert!(matches!(matcher, SpecMatcher::IntelGraphics { .. }));
        assert!(matcher.matches("Intel Iris Xe Graphics"));
        assert!(matcher.matches("Intel® Iris® Xe"));
        assert!(!matcher.matches("Intel Arc Graphics"));

        let arc = SpecMatcher::graphics("Intel Arc 140V");
        assert!(arc.matches("Intel® Arc™ 140V GPU"));
    }

    #[test]
    fn unparseable_graphics_degrades_to_substring() {
        let matcher = SpecMatcher::graphics("Radeon 780M");
        assert_eq!(matcher, SpecMatcher::contains("Radeon 780M"));
        assert!(matcher.matches("AMD radeon 780M"));
    }

    #[test]
    fn capacity_extracts_first_token() {
        let matcher = SpecMatcher::capacity("512 GB M.2 SSD");
        assert_eq!(
            matcher,
            SpecMatcher::Capacity {
                amount: 512,
                unit: CapacityUnit::Gigabytes
            }
        );
        assert!(matcher.matches("512GB M.2 SSD"));
        assert!(matcher.matches("512 GB NVMe"));
        assert!(!matcher.matches("1512GB"));
        assert!(!matcher.matches("1TB M.2 SSD"));

        let terabyte = SpecMatcher::capacity("1tb");
        assert!(terabyte.matches("1TB M.2 SSD"));
    }

    #[test]
    fn capacity_without_token_falls_back_to_raw_value() {
        let matcher = SpecMatcher::capacity("Takılı Değil");
        assert_eq!(matcher, SpecMatcher::contains("Takılı Değil"));
        assert!(matcher.matches("M.2 Slot Takılı Değil"));
    }

    #[test]
    fn token_does_not_run_into_longer_model_numbers() {
        let short = SpecMatcher::token("i7-1370");
        assert!(!short.matches("Intel® Raptor Lake Core™ i7-13700H"));

        let full = SpecMatcher::token("i7-13700H");
        assert!(full.matches("Intel® Raptor Lake Core™ i7-13700H"));
        assert!(full.matches("Intel Core i7-13700H, 14 cores"));
        assert!(!full.matches("Intel Core i7-13700HX"));
    }

    #[test]
    fn metacharacters_are_matched_literally() {
        let display = SpecMatcher::token("15.6\"");
        assert!(display.matches("15.6\" FHD 144Hz"));
        assert!(!display.matches("1556\" panel"));

        let odd = SpecMatcher::contains("(beta)+");
        assert!(odd.matches("build (beta)+ 2"));
        assert!(!odd.matches("build beta 2"));
    }

    #[test]
    fn clauses_avoid_lookaround() {
        let samples = [
            SpecMatcher::memory("2x16GB 4800MHz"),
            SpecMatcher::graphics("6GB RTX 4050"),
            SpecMatcher::graphics("Intel® Iris® Xe"),
            SpecMatcher::capacity("1TB"),
            SpecMatcher::token("Windows 11 Home"),
        ];
        for matcher in samples {
            for clause in matcher.clauses() {
                assert!(!clause.contains("(?="), "lookahead in {clause}");
                assert!(Regex::new(&clause).is_ok(), "invalid clause {clause}");
            }
        }
    }
}
