/// A single bibliographic entry as parsed from a BibTeX export: the entry key,
/// the entry type tag (`article`, `inproceedings`, ...) and the field map.
///
/// Records are never mutated after the parser produces them; field names are
/// lowercased and values are stored verbatim (no type coercion, `year` stays a
/// string until the aggregator needs to order by it).
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub key: String,
    pub entry_type: String,
    fields: Vec<(String, String)>,
}

impl SourceRecord {
    pub fn new(key: String, entry_type: String, fields: Vec<(String, String)>) -> Self {
        SourceRecord {
            key,
            entry_type,
            fields,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Re-serialize the record as a BibTeX entry. Values are brace-delimited,
    /// so anything the parser kept verbatim survives a parse of this output
    /// unchanged (values with nested braces excepted).
    pub fn to_bibtex_string(&self) -> String {
        let mut out = format!("@{}{{{},\n", self.entry_type, self.key);
        for (name, value) in &self.fields {
            out.push_str(&format!("  {} = {{{}}},\n", name, value));
        }
        out.push_str("}\n");
        out
    }
}

/// Read-only projection of a [`SourceRecord`] for a given citation style: the
/// display string, the derived sort year (`None` when missing or non-numeric,
/// which sorts after every numeric year) and a Scholar title-search link.
#[derive(Debug, Clone)]
pub struct RenderedCitation {
    pub key: String,
    pub entry_type: String,
    pub fields: Vec<(String, String)>,
    pub citation: String,
    pub year: Option<i32>,
    pub scholar_url: String,
    /// Display label of the profile this record came from; only the combined
    /// HTML page's filter links read it, the JSON projection never does.
    pub profile: String,
}

impl RenderedCitation {
    /// JSON artifact schema: `key`, `entry_type`, then every BibTeX field as a
    /// string property. Nothing else.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert("key".into(), self.key.clone().into());
        obj.insert("entry_type".into(), self.entry_type.clone().into());
        for (name, value) in &self.fields {
            obj.insert(name.clone(), value.clone().into());
        }
        serde_json::Value::Object(obj)
    }
}
