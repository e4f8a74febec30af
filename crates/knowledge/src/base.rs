//! The knowledge table: region → ordered categories → ordered facts.
//!
//! Built once (either the built-in table or a TOML file) and never
//! mutated afterwards. Category and entry order is the declaration order
//! and is observable through search results.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;

use lugang_core::{Region, Scope};

use crate::KnowledgeError;

/// A named group of facts within one region.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    #[serde(rename = "category")]
    pub name: String,

    #[serde(default)]
    pub entries: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, entries: &[&str]) -> Self {
        Self {
            name: name.into(),
            entries: entries.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Ordered categories of one region.
///
/// Serializes as a JSON object `{category: [facts...]}` in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionTable {
    categories: Vec<Category>,
}

impl RegionTable {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Every fact of every category, in order.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.entries.iter().map(String::as_str))
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }
}

impl Serialize for RegionTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.entries)?;
        }
        map.end()
    }
}

/// On-disk layout of a knowledge file.
#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    #[serde(default)]
    northbound: Vec<Category>,
    #[serde(default)]
    southbound: Vec<Category>,
}

/// The read-only knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    northbound: RegionTable,
    southbound: RegionTable,
}

static BUILTIN: LazyLock<KnowledgeBase> = LazyLock::new(builtin_table);

impl KnowledgeBase {
    pub fn new(northbound: RegionTable, southbound: RegionTable) -> Self {
        Self {
            northbound,
            southbound,
        }
    }

    /// The built-in Hong Kong / Shandong table, shared for the whole process.
    pub fn builtin() -> &'static KnowledgeBase {
        &BUILTIN
    }

    /// Load a knowledge base from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, KnowledgeError> {
        let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let kb = Self::from_toml_str(&content).map_err(|e| match e {
            KnowledgeError::ParseError { reason, .. } => KnowledgeError::ParseError {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        tracing::info!(
            path = %path.display(),
            northbound = kb.northbound.item_count(),
            southbound = kb.southbound.item_count(),
            "Loaded knowledge base"
        );
        Ok(kb)
    }

    /// Parse a knowledge base from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, KnowledgeError> {
        let file: KnowledgeFile = toml::from_str(content).map_err(|e| KnowledgeError::ParseError {
            path: Default::default(),
            reason: e.to_string(),
        })?;
        let kb = Self::new(RegionTable::new(file.northbound), RegionTable::new(file.southbound));
        if kb.total_items() == 0 {
            return Err(KnowledgeError::Empty);
        }
        Ok(kb)
    }

    pub fn region(&self, region: Region) -> &RegionTable {
        match region {
            Region::Northbound => &self.northbound,
            Region::Southbound => &self.southbound,
        }
    }

    /// Flatten the selected region(s) into one ordered candidate list.
    pub fn candidates(&self, scope: Scope) -> Vec<&str> {
        scope
            .regions()
            .iter()
            .flat_map(|r| self.region(*r).entries())
            .collect()
    }

    pub fn total_items(&self) -> usize {
        self.northbound.item_count() + self.southbound.item_count()
    }
}

impl Serialize for KnowledgeBase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(Region::Northbound.as_str(), &self.northbound)?;
        map.serialize_entry(Region::Southbound.as_str(), &self.southbound)?;
        map.end()
    }
}

fn builtin_table() -> KnowledgeBase {
    let northbound = RegionTable::new(vec![
        Category::new(
            "business",
            &[
                "香港股票交易时间为周一至周五上午9:30-12:00，下午1:00-4:00",
                "香港公司注册需要提供董事身份证明、地址证明等文件",
                "香港银行开户通常需要3-5个工作日",
                "香港税率相对较低，企业所得税率为16.5%",
                "香港是国际金融中心，拥有完善的法律体系",
                "香港证券市场对内地投资者开放，通过沪港通、深港通交易",
            ],
        ),
        Category::new(
            "investment",
            &[
                "香港投资移民计划已暂停，可考虑优才计划",
                "香港房产投资需缴纳印花税，首次置业可享优惠",
                "香港与内地签署CEPA协议，为两地贸易提供便利",
            ],
        ),
        Category::new(
            "logistics",
            &[
                "香港港口是全球重要的转运枢纽",
                "香港机场货运量位居世界前列",
                "香港与内地海关实现24小时通关便利",
            ],
        ),
        Category::new(
            "finance",
            &[
                "香港是人民币离岸中心，提供人民币金融服务",
                "香港金融管理局监管银行业务",
                "香港交易所是亚洲重要的证券交易所",
            ],
        ),
    ]);

    let southbound = RegionTable::new(vec![
        Category::new(
            "business",
            &[
                "山东自贸区提供多项优惠政策支持港资企业",
                "青岛港是重要的国际贸易港口，连接一带一路",
                "济南高新区为科技企业提供税收优惠",
                "山东省对港资企业提供绿色通道服务",
                "烟台、威海等城市与韩国贸易往来密切",
            ],
        ),
        Category::new(
            "culture",
            &[
                "山东是孔子故乡，儒家文化发源地",
                "泰山是五岳之首，世界文化与自然双重遗产",
                "山东菜系以鲁菜为代表，注重原汁原味",
                "曲阜三孔是世界文化遗产",
                "山东剪纸、年画等传统工艺闻名全国",
            ],
        ),
        Category::new(
            "education",
            &[
                "山东大学是国家重点大学，在港招生",
                "中国海洋大学海洋科学全国领先",
                "山东师范大学教育学科实力雄厚",
                "青岛科技大学与香港高校有合作项目",
            ],
        ),
        Category::new(
            "tourism",
            &[
                "泰山登山路线多样，适合不同体力游客",
                "青岛海滨风光优美，是避暑胜地",
                "济南泉水众多，被称为泉城",
                "威海是中国最适宜居住的城市之一",
            ],
        ),
    ]);

    KnowledgeBase::new(northbound, southbound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_counts() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.region(Region::Northbound).item_count(), 15);
        assert_eq!(kb.region(Region::Southbound).item_count(), 18);
        assert_eq!(kb.total_items(), 33);
    }

    #[test]
    fn builtin_category_order_is_declaration_order() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(
            kb.region(Region::Northbound).category_names(),
            vec!["business", "investment", "logistics", "finance"]
        );
        assert_eq!(
            kb.region(Region::Southbound).category_names(),
            vec!["business", "culture", "education", "tourism"]
        );
    }

    #[test]
    fn both_candidates_are_northbound_then_southbound() {
        let kb = KnowledgeBase::builtin();
        let north = kb.candidates(Scope::Northbound);
        let south = kb.candidates(Scope::Southbound);
        let both = kb.candidates(Scope::Both);

        let mut expected = north.clone();
        expected.extend(south.iter());
        assert_eq!(both, expected);
        assert_eq!(both[0], "香港股票交易时间为周一至周五上午9:30-12:00，下午1:00-4:00");
        assert_eq!(both[15], "山东自贸区提供多项优惠政策支持港资企业");
    }

    #[test]
    fn builtin_is_shared() {
        assert!(std::ptr::eq(KnowledgeBase::builtin(), KnowledgeBase::builtin()));
    }

    #[test]
    fn region_table_serializes_in_order() {
        let kb = KnowledgeBase::builtin();
        let json = serde_json::to_string(kb.region(Region::Southbound)).unwrap();
        let business = json.find("\"business\"").unwrap();
        let culture = json.find("\"culture\"").unwrap();
        let tourism = json.find("\"tourism\"").unwrap();
        assert!(business < culture && culture < tourism);
    }

    #[test]
    fn knowledge_base_serializes_both_regions() {
        let value = serde_json::to_value(KnowledgeBase::builtin()).unwrap();
        assert_eq!(value["northbound"]["finance"].as_array().unwrap().len(), 3);
        assert_eq!(value["southbound"]["culture"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn parse_from_toml() {
        let kb = KnowledgeBase::from_toml_str(
            r#"
[[northbound]]
category = "business"
entries = ["港股通每日额度", "香港银行开户"]

[[southbound]]
category = "tourism"
entries = ["蓬莱阁"]

[[southbound]]
category = "culture"
entries = []
"#,
        )
        .unwrap();
        assert_eq!(kb.total_items(), 3);
        assert_eq!(
            kb.region(Region::Southbound).category_names(),
            vec!["tourism", "culture"]
        );
    }

    #[test]
    fn empty_file_is_rejected() {
        let result = KnowledgeBase::from_toml_str("");
        assert!(matches!(result, Err(KnowledgeError::Empty)));
    }

    #[test]
    fn malformed_file_is_rejected() {
        let result = KnowledgeBase::from_toml_str("[[northbound]]\nentries = 5\n");
        assert!(matches!(result, Err(KnowledgeError::ParseError { .. })));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knowledge.toml");
        std::fs::write(
            &path,
            "[[northbound]]\ncategory = \"finance\"\nentries = [\"香港金融管理局\"]\n",
        )
        .unwrap();

        let kb = KnowledgeBase::load_from(&path).unwrap();
        assert_eq!(kb.candidates(Scope::Both), vec!["香港金融管理局"]);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = KnowledgeBase::load_from(Path::new("/nonexistent/knowledge.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/knowledge.toml"));
    }
}
