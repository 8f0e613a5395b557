use std::fmt;
use std::iter;

use quick_xml::escape::escape;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::TriState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSpec {
    #[serde(default, alias = "minRes", skip_serializing_if = "Option::is_none")]
    pub min_resolution: Option<f64>,
    #[serde(default, alias = "maxRes", skip_serializing_if = "Option::is_none")]
    pub max_resolution: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub keywords: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub authors: Vec<String>,
    #[serde(
        default,
        alias = "pdbIds",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub structure_ids: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub title_contains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental_method: Option<String>,
    #[serde(default, rename = "containsRNA", deserialize_with = "null_as_default")]
    pub contains_rna: TriState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contains_protein: TriState,
    #[serde(default, rename = "containsDNA", deserialize_with = "null_as_default")]
    pub contains_dna: TriState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contains_hybrid: TriState,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SearchSpec {
    pub fn with_hits(self, hits: Vec<String>) -> SearchResult {
        SearchResult { spec: self, hits }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub spec: SearchSpec,
    pub hits: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    None,
    And,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Resolution {
        min: Option<f64>,
        max: Option<f64>,
    },
    ReleaseDate {
        min: Option<String>,
        max: Option<String>,
    },
    TitleContains(String),
    Keywords(String),
    StructureIds(Vec<String>),
    ExperimentalMethod(String),
    Author(String),
    ChainType {
        protein: TriState,
        dna: TriState,
        rna: TriState,
        hybrid: TriState,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub level: usize,
    pub conjunction: Conjunction,
    pub criterion: Criterion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub clauses: Vec<Clause>,
}

impl CompiledQuery {
    pub fn to_document(&self) -> String {
        self.to_string()
    }
}

pub fn compile(spec: &SearchSpec) -> CompiledQuery {
    let clauses = criteria(spec)
        .enumerate()
        .map(|(level, criterion)| Clause {
            level,
            conjunction: if level == 0 {
                Conjunction::None
            } else {
                Conjunction::And
            },
            criterion,
        })
        .collect();
    CompiledQuery { clauses }
}

fn criteria(spec: &SearchSpec) -> impl Iterator<Item = Criterion> + '_ {
    let resolution = (spec.min_resolution.is_some() || spec.max_resolution.is_some()).then(|| {
        Criterion::Resolution {
            min: spec.min_resolution,
            max: spec.max_resolution,
        }
    });

    let min_date = non_empty(&spec.min_date);
    let max_date = non_empty(&spec.max_date);
    let release_date = (min_date.is_some() || max_date.is_some())
        .then(|| Criterion::ReleaseDate {
            min: min_date.clone(),
            max: max_date.clone(),
        });

    let keywords = (!spec.keywords.is_empty()).then(|| Criterion::Keywords(spec.keywords.join(" ")));
    let structure_ids =
        (!spec.structure_ids.is_empty()).then(|| Criterion::StructureIds(spec.structure_ids.clone()));
    let method = non_empty(&spec.experimental_method).map(Criterion::ExperimentalMethod);

    let chain_type = Criterion::ChainType {
        protein: spec.contains_protein,
        dna: spec.contains_dna,
        rna: spec.contains_rna,
        hybrid: spec.contains_hybrid,
    };

    resolution
        .into_iter()
        .chain(release_date)
        .chain(spec.title_contains.iter().cloned().map(Criterion::TitleContains))
        .chain(keywords)
        .chain(structure_ids)
        .chain(method)
        .chain(spec.authors.iter().cloned().map(Criterion::Author))
        .chain(iter::once(chain_type))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|value| !value.is_empty()).cloned()
}

/// Splits the newline-delimited search response into identifiers, dropping the
/// empty entry left by a trailing line terminator.
pub fn parse_hits(raw: &str) -> Vec<String> {
    let mut hits: Vec<String> = raw
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect();
    if hits.last().is_some_and(|last| last.is_empty()) {
        hits.pop();
    }
    hits
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<orgPdbCompositeQuery version=\"1.0\">")?;
        for clause in &self.clauses {
            write!(f, "{clause}")?;
        }
        f.write_str("</orgPdbCompositeQuery>")
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<queryRefinement><queryRefinementLevel>{}</queryRefinementLevel>",
            self.level
        )?;
        if self.conjunction == Conjunction::And {
            f.write_str("<conjunctionType>and</conjunctionType>")?;
        }
        f.write_str("<orgPdbQuery><version>head</version>")?;
        write!(f, "{}", self.criterion)?;
        f.write_str("</orgPdbQuery></queryRefinement>")
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Resolution { min, max } => {
                query_head(f, "ResolutionQuery", "Resolution query")?;
                f.write_str(
                    "<refine.ls_d_res_high.comparator>between</refine.ls_d_res_high.comparator>",
                )?;
                if let Some(min) = min {
                    write!(f, "<refine.ls_d_res_high.min>{min}</refine.ls_d_res_high.min>")?;
                }
                if let Some(max) = max {
                    write!(f, "<refine.ls_d_res_high.max>{max}</refine.ls_d_res_high.max>")?;
                }
                Ok(())
            }
            Criterion::ReleaseDate { min, max } => {
                query_head(f, "ReleaseDateQuery", "Release Date query")?;
                f.write_str(
                    "<refine.ls_d_res_high.comparator>between</refine.ls_d_res_high.comparator>",
                )?;
                if let Some(min) = min {
                    write!(
                        f,
                        "<database_PDB_rev.date.min>{}</database_PDB_rev.date.min>",
                        escape(min.as_str())
                    )?;
                }
                if let Some(max) = max {
                    write!(
                        f,
                        "<database_PDB_rev.date.max>{}</database_PDB_rev.date.max>",
                        escape(max.as_str())
                    )?;
                }
                Ok(())
            }
            Criterion::TitleContains(fragment) => {
                let fragment = escape(fragment.as_str());
                query_head(
                    f,
                    "StructTitleQuery",
                    &format!(
                        "StructTitleQuery: struct.title.comparator=contains struct.title.value={fragment}"
                    ),
                )?;
                write!(
                    f,
                    "<struct.title.comparator>contains</struct.title.comparator><struct.title.value>{fragment}</struct.title.value>"
                )
            }
            Criterion::Keywords(keywords) => {
                let keywords = escape(keywords.as_str());
                query_head(
                    f,
                    "AdvancedKeywordQuery",
                    &format!("Text Search for: {keywords}"),
                )?;
                write!(f, "<keywords>{keywords}</keywords>")
            }
            Criterion::StructureIds(ids) => {
                let joined = ids.join(", ");
                let joined = escape(joined.as_str());
                query_head(
                    f,
                    "StructureIdQuery",
                    &format!(
                        "Simple query for a list of PDB IDs ({} IDs) :{joined}",
                        ids.len()
                    ),
                )?;
                write!(f, "<structureIdList>{joined}</structureIdList>")
            }
            Criterion::ExperimentalMethod(method) => {
                let method = escape(method.as_str());
                query_head(
                    f,
                    "ExpTypeQuery",
                    &format!("Experimental Method is {method}"),
                )?;
                write!(f, "<mvStructure.expMethod.value>{method}</mvStructure.expMethod.value>")
            }
            Criterion::Author(author) => {
                let author = escape(author.as_str());
                query_head(
                    f,
                    "AdvancedAuthorQuery",
                    &format!(
                        "Author Search: Author Search: audit_author.name={author} OR (citation_author.name={author} AND citation_author.citation_id=primary)"
                    ),
                )?;
                write!(
                    f,
                    "<exactMatch>false</exactMatch><audit_author.name>{author}</audit_author.name>"
                )
            }
            Criterion::ChainType {
                protein,
                dna,
                rna,
                hybrid,
            } => {
                query_head(f, "ChainTypeQuery", "Chain Type")?;
                write!(
                    f,
                    "<containsProtein>{protein}</containsProtein><containsDna>{dna}</containsDna><containsRna>{rna}</containsRna><containsHybrid>{hybrid}</containsHybrid>"
                )
            }
        }
    }
}

fn query_head(f: &mut fmt::Formatter<'_>, query_type: &str, description: &str) -> fmt::Result {
    write!(
        f,
        "<queryType>org.pdb.query.simple.{query_type}</queryType><description>{description}</description>"
    )
}
