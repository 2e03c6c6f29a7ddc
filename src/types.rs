use serde::{Deserialize, Serialize};

/// One enterprise as read from its registry detail page.
///
/// Built once by the extractor and handed to a sink as a unit. Serialized
/// keys use the registry's own vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterpriseRecord {
    pub numero: String,
    pub generalites: Generalities,
    pub fonctions: Vec<OfficerFunction>,
    pub capacites: Vec<Capacity>,
    pub qualites: Vec<Qualification>,
    pub autorisations: Vec<Authorization>,
    pub nace_codes: NaceCodes,
    pub donnees_financieres: FinancialSummary,
    pub liens_entites: Vec<RelatedEntityLink>,
    pub liens_externes: Vec<ExternalLink>,
}

/// Identity block. A field is only set when its row existed and had text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Generalities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statut: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situation_juridique: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denomination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forme_legale: Option<String>,
}

impl Generalities {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficerFunction {
    pub titre: String,
    pub nom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valeur: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualification {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authorization {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Edition of the NACE activity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaceRevision {
    Nace2025,
    Nace2008,
    Nace2003,
}

impl NaceRevision {
    pub const ALL: [NaceRevision; 3] = [Self::Nace2025, Self::Nace2008, Self::Nace2003];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NaceCode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<String>,
}

impl NaceCode {
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.description.is_none() && self.date_debut.is_none()
    }
}

/// Codes per revision; all three keys are always serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NaceCodes {
    #[serde(rename = "2025", default)]
    pub nace_2025: Vec<NaceCode>,
    #[serde(rename = "2008", default)]
    pub nace_2008: Vec<NaceCode>,
    #[serde(rename = "2003", default)]
    pub nace_2003: Vec<NaceCode>,
}

impl NaceCodes {
    pub fn get(&self, revision: NaceRevision) -> &[NaceCode] {
        match revision {
            NaceRevision::Nace2025 => &self.nace_2025,
            NaceRevision::Nace2008 => &self.nace_2008,
            NaceRevision::Nace2003 => &self.nace_2003,
        }
    }

    pub fn set(&mut self, revision: NaceRevision, codes: Vec<NaceCode>) {
        match revision {
            NaceRevision::Nace2025 => self.nace_2025 = codes,
            NaceRevision::Nace2008 => self.nace_2008 = codes,
            NaceRevision::Nace2003 => self.nace_2003 = codes,
        }
    }

    pub fn is_empty(&self) -> bool {
        NaceRevision::ALL.iter().all(|r| self.get(*r).is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assemblee_generale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fin_annee_comptable: Option<String>,
}

impl FinancialSummary {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Link to another registered entity. The "no data" sentinel is carried as
/// an entry holding only `description`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedEntityLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RelatedEntityLink {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One enterprise to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Identifier as written in the seed source, carried into the record.
    pub numero: String,
    pub url: String,
}
