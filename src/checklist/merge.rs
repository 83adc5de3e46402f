//! Section Merger & Deduplicator
//!
//! Routes climate-driven items into the most relevant existing section and
//! removes items that are interchangeable with one already listed. Both rely on
//! keyword tables built once from reference data.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CatalogKind, GeneratedItem, GeneratedSection};
use crate::{Result, TravelPrepError};

/// Minimum length of a word taking part in similarity checks
const MIN_SIGNIFICANT_WORD_LEN: usize = 3;

/// Keywords mapping labels to one canonical dedup key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupKeyEntry {
    pub key: String,
    pub keywords: Vec<String>,
}

/// Keywords routing climate items to a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRoute {
    pub section: String,
    pub keywords: Vec<String>,
}

/// Section receiving climate items no route claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSection {
    pub id: String,
    pub title: String,
}

/// Keyword configuration as stored in reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordConfig {
    #[serde(default)]
    pub stopwords: Vec<String>,
    /// Ordered; the first entry with a matching keyword gives the key
    pub dedup_keys: Vec<DedupKeyEntry>,
    /// Ordered; the first route with a matching keyword wins
    pub section_routes: Vec<SectionRoute>,
    pub default_section: DefaultSection,
}

type Phrase = Vec<String>;

/// Normalized keyword tables
#[derive(Debug, Clone)]
pub struct KeywordTables {
    stopwords: HashSet<String>,
    dedup_keys: Vec<(String, Vec<Phrase>)>,
    section_routes: Vec<(String, Vec<Phrase>)>,
    default_section: DefaultSection,
}

/// Lower-case and strip diacritics
#[must_use]
pub fn fold(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            'à' | 'á' | 'â' | 'ä' | 'ã' => folded.push('a'),
            'é' | 'è' | 'ê' | 'ë' => folded.push('e'),
            'î' | 'ï' | 'í' | 'ì' => folded.push('i'),
            'ô' | 'ö' | 'ó' | 'ò' | 'õ' => folded.push('o'),
            'ù' | 'û' | 'ü' | 'ú' => folded.push('u'),
            'ç' => folded.push('c'),
            'ñ' => folded.push('n'),
            'ÿ' => folded.push('y'),
            'œ' => folded.push_str("oe"),
            'æ' => folded.push_str("ae"),
            other => folded.push(other),
        }
    }
    folded
}

/// Label word matches a keyword word exactly or as its plural
fn word_matches(word: &str, keyword: &str) -> bool {
    word == keyword
        || word
            .strip_prefix(keyword)
            .is_some_and(|rest| matches!(rest, "s" | "x" | "es"))
}

/// Whether `phrase` occurs as a contiguous run of `words`
fn contains_phrase(words: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty()
        && words.windows(phrase.len()).any(|window| {
            window
                .iter()
                .zip(phrase)
                .all(|(word, keyword)| word_matches(word, keyword))
        })
}

impl KeywordTables {
    /// Normalize a keyword configuration; empty keywords are rejected
    pub fn new(config: KeywordConfig) -> Result<Self> {
        let stopwords: HashSet<String> = config.stopwords.iter().map(|w| fold(w.trim())).collect();
        let mut tables = Self {
            stopwords,
            dedup_keys: Vec::new(),
            section_routes: Vec::new(),
            default_section: config.default_section,
        };

        for entry in config.dedup_keys {
            let phrases = tables.phrases(&entry.key, &entry.keywords)?;
            tables.dedup_keys.push((entry.key, phrases));
        }
        for route in config.section_routes {
            let phrases = tables.phrases(&route.section, &route.keywords)?;
            tables.section_routes.push((route.section, phrases));
        }

        Ok(tables)
    }

    fn phrases(&self, owner: &str, keywords: &[String]) -> Result<Vec<Phrase>> {
        keywords
            .iter()
            .map(|keyword| {
                let phrase = self.words(keyword);
                if phrase.is_empty() {
                    Err(TravelPrepError::reference_data(format!(
                        "keyword '{keyword}' of '{owner}' has no significant word"
                    )))
                } else {
                    Ok(phrase)
                }
            })
            .collect()
    }

    /// Folded words of a label, stopwords removed
    #[must_use]
    pub fn words(&self, label: &str) -> Vec<String> {
        fold(label)
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty() && !self.stopwords.contains(*word))
            .map(str::to_string)
            .collect()
    }

    /// Words taking part in similarity checks
    #[must_use]
    pub fn significant_words(&self, label: &str) -> BTreeSet<String> {
        self.words(label)
            .into_iter()
            .filter(|word| word.chars().count() >= MIN_SIGNIFICANT_WORD_LEN)
            .collect()
    }

    /// Canonical dedup key of a label; `None` means never deduplicated
    #[must_use]
    pub fn canonical_key(&self, label: &str) -> Option<&str> {
        let words = self.words(label);
        self.dedup_keys
            .iter()
            .find(|(_, phrases)| phrases.iter().any(|phrase| contains_phrase(&words, phrase)))
            .map(|(key, _)| key.as_str())
    }

    /// Section id a climate item belongs in
    #[must_use]
    pub fn route(&self, label: &str) -> &str {
        let words = self.words(label);
        self.section_routes
            .iter()
            .find(|(_, phrases)| phrases.iter().any(|phrase| contains_phrase(&words, phrase)))
            .map_or(self.default_section.id.as_str(), |(section, _)| section.as_str())
    }

    #[must_use]
    pub fn default_section(&self) -> &DefaultSection {
        &self.default_section
    }
}

/// Shared significant words relative to the smaller of the two sets
#[must_use]
pub fn similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    shared as f64 / smaller as f64
}

/// Insert climate items into the sections they belong to.
///
/// An item is dropped when its target section already lists a similar item.
/// Items whose route names a missing section go to the default section, which
/// is created when absent.
#[must_use]
pub fn merge_climate_items_into_sections(
    mut sections: Vec<GeneratedSection>,
    climate_items: Vec<GeneratedItem>,
    tables: &KeywordTables,
    threshold: f64,
) -> Vec<GeneratedSection> {
    for item in climate_items {
        let target = tables.route(&item.label);
        let default = tables.default_section();

        let index = match sections
            .iter()
            .position(|s| s.id == target)
            .or_else(|| sections.iter().position(|s| s.id == default.id))
        {
            Some(index) => index,
            None => {
                sections.push(GeneratedSection::new(
                    &default.id,
                    &default.title,
                    CatalogKind::Climate,
                ));
                sections.len() - 1
            }
        };

        let words = tables.significant_words(&item.label);
        let section = &mut sections[index];
        let duplicate = section.items.iter().find(|existing| {
            similarity(&words, &tables.significant_words(&existing.label)) >= threshold
        });

        if let Some(existing) = duplicate {
            debug!(
                "Climate item '{}' already covered by '{}' in section {}",
                item.label, existing.label, section.id
            );
        } else {
            debug!("Climate item '{}' merged into section {}", item.label, section.id);
            section.items.push(item);
        }
    }

    sections
}

/// Drop items whose canonical key is owned by another section.
///
/// The owner of a key is the section of its first occurrence in catalog
/// processing order (core, profile, activity, climate), then section order,
/// then item order. Later occurrences elsewhere are removed; repeats inside the
/// owner are left to [`deduplicate_within_section`].
#[must_use]
pub fn deduplicate_across_sections(
    mut sections: Vec<GeneratedSection>,
    tables: &KeywordTables,
) -> Vec<GeneratedSection> {
    let mut occurrences: Vec<(usize, usize, usize)> = sections
        .iter()
        .enumerate()
        .flat_map(|(s, section)| {
            section
                .items
                .iter()
                .enumerate()
                .map(move |(i, item)| (item.provenance.rank(), s, i))
        })
        .collect();
    occurrences.sort_by_key(|&(rank, _, _)| rank);

    let mut owners: HashMap<&str, usize> = HashMap::new();
    let mut dropped: HashSet<(usize, usize)> = HashSet::new();

    for (_, s, i) in occurrences {
        let item = &sections[s].items[i];
        let Some(key) = tables.canonical_key(&item.label) else {
            continue;
        };
        match owners.get(key) {
            None => {
                owners.insert(key, s);
            }
            Some(&owner) if owner != s => {
                debug!(
                    "Dropping '{}' from section {}: '{}' already owned by section {}",
                    item.label, sections[s].id, key, sections[owner].id
                );
                dropped.insert((s, i));
            }
            Some(_) => {}
        }
    }

    if dropped.is_empty() {
        return sections;
    }

    for (s, section) in sections.iter_mut().enumerate() {
        let mut index = 0;
        section.items.retain(|_| {
            let keep = !dropped.contains(&(s, index));
            index += 1;
            keep
        });
    }
    sections
}

/// Keep only the first item of each canonical key within a section
#[must_use]
pub fn deduplicate_within_section(
    mut section: GeneratedSection,
    tables: &KeywordTables,
) -> GeneratedSection {
    let mut seen: HashSet<String> = HashSet::new();
    section.items.retain(|item| match tables.canonical_key(&item.label) {
        Some(key) => {
            let first = seen.insert(key.to_string());
            if !first {
                debug!("Dropping repeated '{}' ({}) in section {}", item.label, key, section.id);
            }
            first
        }
        None => true,
    });
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn tables() -> KeywordTables {
        KeywordTables::new(KeywordConfig {
            stopwords: ["de", "d", "la", "le", "les", "pour", "et"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            dedup_keys: vec![
                DedupKeyEntry {
                    key: "action-camera".to_string(),
                    keywords: vec!["action camera".to_string(), "camera sport".to_string()],
                },
                DedupKeyEntry {
                    key: "compact-camera".to_string(),
                    keywords: vec!["compact camera".to_string()],
                },
                DedupKeyEntry {
                    key: "camera".to_string(),
                    keywords: vec![
                        "camera".to_string(),
                        "photo camera".to_string(),
                        "appareil photo".to_string(),
                    ],
                },
                DedupKeyEntry {
                    key: "sunscreen".to_string(),
                    keywords: vec!["crème solaire".to_string(), "sunscreen".to_string()],
                },
            ],
            section_routes: vec![
                SectionRoute {
                    section: "sante".to_string(),
                    keywords: vec!["médicament".to_string(), "répulsif".to_string()],
                },
                SectionRoute {
                    section: "hygiene".to_string(),
                    keywords: vec!["crème".to_string(), "sunscreen".to_string()],
                },
                SectionRoute {
                    section: "tech".to_string(),
                    keywords: vec!["chargeur".to_string(), "camera".to_string()],
                },
            ],
            default_section: DefaultSection {
                id: "bagages".to_string(),
                title: "Bagages".to_string(),
            },
        })
        .unwrap()
    }

    fn item(label: &str, provenance: CatalogKind) -> GeneratedItem {
        GeneratedItem {
            label: label.to_string(),
            priority: Priority::Medium,
            lead_time: None,
            deadline: None,
            moment: None,
            quantity: None,
            advice: None,
            provenance,
        }
    }

    fn section(id: &str, provenance: CatalogKind, labels: &[&str]) -> GeneratedSection {
        GeneratedSection {
            id: id.to_string(),
            title: id.to_string(),
            provenance,
            items: labels.iter().map(|l| item(l, provenance)).collect(),
        }
    }

    fn labels(section: &GeneratedSection) -> Vec<&str> {
        section.items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_fold_strips_accents() {
        assert_eq!(fold("Crème Solaire Été"), "creme solaire ete");
        assert_eq!(fold("Œuf"), "oeuf");
    }

    #[test]
    fn test_canonical_keys() {
        let tables = tables();
        assert_eq!(tables.canonical_key("Camera"), Some("camera"));
        assert_eq!(tables.canonical_key("Photo camera"), Some("camera"));
        assert_eq!(tables.canonical_key("Compact camera"), Some("compact-camera"));
        assert_eq!(tables.canonical_key("Action camera"), Some("action-camera"));
        assert_eq!(tables.canonical_key("Appareil photo"), Some("camera"));
        assert_eq!(tables.canonical_key("Appareil photo compact"), Some("camera"));
        assert_eq!(tables.canonical_key("Appareils photos"), Some("camera"));
        assert_eq!(tables.canonical_key("Crème solaire indice 50"), Some("sunscreen"));
        assert_eq!(tables.canonical_key("Chapeau"), None);
        assert_eq!(tables.canonical_key("Cameraman"), None);
    }

    #[test]
    fn test_routing() {
        let tables = tables();
        assert_eq!(tables.route("Crème solaire"), "hygiene");
        assert_eq!(tables.route("Médicaments contre le mal des transports"), "sante");
        assert_eq!(tables.route("Chargeur solaire"), "tech");
        assert_eq!(tables.route("Polaire"), "bagages");
    }

    #[test]
    fn test_empty_keyword_is_rejected() {
        let result = KeywordTables::new(KeywordConfig {
            stopwords: vec!["de".to_string()],
            dedup_keys: vec![DedupKeyEntry {
                key: "x".to_string(),
                keywords: vec!["de".to_string()],
            }],
            section_routes: vec![],
            default_section: DefaultSection {
                id: "bagages".to_string(),
                title: "Bagages".to_string(),
            },
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_similarity() {
        let tables = tables();
        let a = tables.significant_words("Crème solaire");
        let b = tables.significant_words("Crème solaire indice 50");
        assert_eq!(similarity(&a, &b), 1.0);

        let c = tables.significant_words("Lunettes de soleil");
        assert_eq!(similarity(&a, &c), 0.0);
        assert_eq!(similarity(&a, &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_merge_routes_and_suppresses_similar_items() {
        let tables = tables();
        let sections = vec![
            section("hygiene", CatalogKind::Core, &["Brosse à dents", "Crème solaire"]),
            section("bagages", CatalogKind::Core, &["Valise"]),
        ];
        let climate = vec![
            item("Crème solaire indice 50", CatalogKind::Climate),
            item("Polaire", CatalogKind::Climate),
            item("Répulsif anti-moustiques", CatalogKind::Climate),
        ];

        let merged = merge_climate_items_into_sections(sections, climate, &tables, 0.6);
        assert_eq!(merged.len(), 2);
        assert_eq!(labels(&merged[0]), vec!["Brosse à dents", "Crème solaire"]);
        // No "sante" section: the repellent falls back to the default section
        assert_eq!(
            labels(&merged[1]),
            vec!["Valise", "Polaire", "Répulsif anti-moustiques"]
        );
    }

    #[test]
    fn test_merge_creates_default_section_when_missing() {
        let tables = tables();
        let merged = merge_climate_items_into_sections(
            vec![],
            vec![item("Bonnet", CatalogKind::Climate)],
            &tables,
            0.6,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "bagages");
        assert_eq!(merged[0].provenance, CatalogKind::Climate);
    }

    #[test]
    fn test_first_occurrence_wins_across_sections() {
        let tables = tables();
        let sections = vec![
            section("tech", CatalogKind::Core, &["Appareil photo", "Chargeur"]),
            section("activite-plage", CatalogKind::Activity, &["Appareil photo compact", "Serviette"]),
        ];

        let deduped = deduplicate_across_sections(sections, &tables);
        assert_eq!(labels(&deduped[0]), vec!["Appareil photo", "Chargeur"]);
        assert_eq!(labels(&deduped[1]), vec!["Serviette"]);
    }

    #[test]
    fn test_catalog_rank_beats_section_position() {
        let tables = tables();
        let mut hygiene = section("hygiene", CatalogKind::Core, &["Brosse à dents"]);
        hygiene.items.push(item("Crème solaire", CatalogKind::Climate));
        let sections = vec![
            hygiene,
            section("activite-plage", CatalogKind::Activity, &["Crème solaire waterproof"]),
        ];

        let deduped = deduplicate_across_sections(sections, &tables);
        assert_eq!(labels(&deduped[0]), vec!["Brosse à dents"]);
        assert_eq!(labels(&deduped[1]), vec!["Crème solaire waterproof"]);
    }

    #[test]
    fn test_distinct_keys_are_kept() {
        let tables = tables();
        let sections = vec![
            section("tech", CatalogKind::Core, &["Camera"]),
            section("activite-plongee", CatalogKind::Activity, &["Action camera", "Compact camera"]),
        ];

        let deduped = deduplicate_across_sections(sections, &tables);
        assert_eq!(labels(&deduped[1]), vec!["Action camera", "Compact camera"]);
    }

    #[test]
    fn test_deduplication_is_idempotent() {
        let tables = tables();
        let sections = vec![
            section("tech", CatalogKind::Core, &["Appareil photo", "Chapeau"]),
            section("profil-famille", CatalogKind::Profile, &["Camera", "Crème solaire"]),
            section("activite-plage", CatalogKind::Activity, &["Crème solaire", "Photo camera", "Chapeau"]),
        ];

        let once = deduplicate_across_sections(sections, &tables);
        let twice = deduplicate_across_sections(once.clone(), &tables);
        assert_eq!(once, twice);
        assert_eq!(labels(&once[2]), vec!["Chapeau"]);
    }

    #[test]
    fn test_within_section_dedup() {
        let tables = tables();
        let plage = section(
            "activite-plage",
            CatalogKind::Activity,
            &["Crème solaire", "Serviette", "Crème solaire indice 50", "Chapeau", "Chapeau"],
        );

        let deduped = deduplicate_within_section(plage, &tables);
        // Labels without a dedup key are never collapsed
        assert_eq!(
            labels(&deduped),
            vec!["Crème solaire", "Serviette", "Chapeau", "Chapeau"]
        );
    }
}
