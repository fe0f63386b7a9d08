//! The built-in document catalog.
//!
//! Three fixed groups of study notes hosted on the static file host: AWS and GCP
//! Markdown notes, and a set of AWS PDF handouts. The catalog is compiled in and
//! never changes at runtime; everything else in the crate refers to an entry by
//! its relative `path`.

use serde::Serialize;

/// How a document is presented once selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Fetched as text and rendered in the content pane.
    Markdown,
    /// Never fetched; handed to an external viewer.
    Pdf,
}

impl DocumentKind {
    /// Classify a relative path by its suffix (`.pdf`, ASCII case-insensitive).
    pub fn from_path(path: &str) -> Self {
        let is_pdf = path.len() >= 4
            && path
                .get(path.len() - 4..)
                .is_some_and(|ext| ext.eq_ignore_ascii_case(".pdf"));
        if is_pdf {
            DocumentKind::Pdf
        } else {
            DocumentKind::Markdown
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentEntry {
    pub title: &'static str,
    pub path: &'static str,
    /// Opaque icon identifier (Font Awesome class names in the shipped catalog).
    pub icon: &'static str,
    pub kind: DocumentKind,
}

impl DocumentEntry {
    pub fn new(title: &'static str, path: &'static str, icon: &'static str) -> Self {
        Self {
            title,
            path,
            icon,
            kind: DocumentKind::from_path(path),
        }
    }

    /// Last path segment, e.g. `EC2.md`.
    pub fn file_name(&self) -> &'static str {
        file_name(self.path)
    }

    pub fn is_pdf(&self) -> bool {
        self.kind == DocumentKind::Pdf
    }
}

/// A named, ordered group of entries.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogGroup {
    pub name: &'static str,
    pub entries: Vec<DocumentEntry>,
}

impl CatalogGroup {
    /// Entries whose title contains `query`, ignoring case. An empty query keeps
    /// every entry. Order is preserved.
    pub fn filter(&self, query: &str) -> Vec<&DocumentEntry> {
        filter_entries(&self.entries, query)
    }
}

/// The full catalog: AWS Markdown, GCP Markdown, then PDF resources.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub groups: Vec<CatalogGroup>,
}

/// Index of the AWS Markdown group in [`Catalog::groups`].
pub const AWS_GROUP: usize = 0;
/// Index of the GCP Markdown group in [`Catalog::groups`].
pub const GCP_GROUP: usize = 1;
/// Index of the PDF group in [`Catalog::groups`].
pub const PDF_GROUP: usize = 2;

impl Catalog {
    /// The catalog shipped with the dashboard.
    pub fn builtin() -> Self {
        Self {
            groups: vec![
                CatalogGroup {
                    name: "AWS Documentation",
                    entries: aws_docs(),
                },
                CatalogGroup {
                    name: "GCP Documentation",
                    entries: gcp_docs(),
                },
                CatalogGroup {
                    name: "PDF Resources",
                    entries: aws_pdf_docs(),
                },
            ],
        }
    }

    pub fn aws(&self) -> &CatalogGroup {
        &self.groups[AWS_GROUP]
    }

    pub fn gcp(&self) -> &CatalogGroup {
        &self.groups[GCP_GROUP]
    }

    pub fn pdfs(&self) -> &CatalogGroup {
        &self.groups[PDF_GROUP]
    }

    pub fn entries(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }

    /// First entry with the given path.
    pub fn find(&self, path: &str) -> Option<&DocumentEntry> {
        self.entries().find(|entry| entry.path == path)
    }

    /// Group that lists the given path.
    pub fn group_for(&self, path: &str) -> Option<&CatalogGroup> {
        self.groups
            .iter()
            .find(|group| group.entries.iter().any(|entry| entry.path == path))
    }

    /// Apply the title filter to every group, keeping group order.
    pub fn filtered(&self, query: &str) -> Vec<(&CatalogGroup, Vec<&DocumentEntry>)> {
        self.groups
            .iter()
            .map(|group| (group, group.filter(query)))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Case-insensitive substring filter over titles.
pub fn filter_entries<'a>(entries: &'a [DocumentEntry], query: &str) -> Vec<&'a DocumentEntry> {
    if query.is_empty() {
        return entries.iter().collect();
    }
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.title.to_lowercase().contains(&needle))
        .collect()
}

/// Last `/`-separated segment of a relative path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// First `/`-separated segment, used as the breadcrumb group label.
pub fn top_segment(path: &str) -> &str {
    path.split('/').next().unwrap_or(path)
}

fn aws_docs() -> Vec<DocumentEntry> {
    vec![
        DocumentEntry::new("API Gateway", "AWS/API_Gateway.md", "fa-solid fa-network-wired"),
        DocumentEntry::new(
            "AWS CLI Commands",
            "AWS/aws-cli-commands-reference.md",
            "fa-solid fa-terminal",
        ),
        DocumentEntry::new("CloudFormation", "AWS/CloudFormation.md", "fa-solid fa-layer-group"),
        DocumentEntry::new("CloudFront", "AWS/CloudFront.md", "fa-solid fa-globe"),
        DocumentEntry::new("CloudWatch", "AWS/CloudWatch.md", "fa-solid fa-chart-line"),
        DocumentEntry::new("DynamoDB", "AWS/DynamoDB.md", "fa-solid fa-database"),
        DocumentEntry::new("EBS", "AWS/EBS.md", "fa-solid fa-hard-drive"),
        DocumentEntry::new("EC2", "AWS/EC2.md", "fa-solid fa-server"),
        DocumentEntry::new("ECS", "AWS/ECS.md", "fa-solid fa-ship"),
        DocumentEntry::new("IAM", "AWS/IAM.md", "fa-solid fa-user-shield"),
        DocumentEntry::new("Lambda", "AWS/Lambda.md", "fa-solid fa-code"),
        DocumentEntry::new("Networking", "AWS/Networking.md", "fa-solid fa-network-wired"),
        DocumentEntry::new("RDS", "AWS/RDS.md", "fa-solid fa-database"),
        DocumentEntry::new("Route53", "AWS/Route53.md", "fa-solid fa-route"),
        DocumentEntry::new("S3", "AWS/S3.md", "fa-solid fa-cube"),
        DocumentEntry::new("SNS & SQS", "AWS/SNS_SQS.md", "fa-solid fa-bell"),
        DocumentEntry::new("Storage", "AWS/storage.md", "fa-solid fa-hdd"),
        DocumentEntry::new("VPC", "AWS/VPC.md", "fa-solid fa-network-wired"),
        DocumentEntry::new(
            "GCloud Commands",
            "AWS/gcloud-commands-reference.md",
            "fa-solid fa-terminal",
        ),
        DocumentEntry::new(
            "GCP-AWS Migration",
            "AWS/gcp-aws-migration.md",
            "fa-solid fa-exchange-alt",
        ),
    ]
}

fn gcp_docs() -> Vec<DocumentEntry> {
    vec![
        DocumentEntry::new("Cloud Functions", "GCP/CloudFunctions.md", "fa-solid fa-bolt"),
        DocumentEntry::new("Cloud Storage", "GCP/CloudStorage.md", "fa-solid fa-database"),
        DocumentEntry::new("Compute Engine", "GCP/ComputeEngine.md", "fa-solid fa-server"),
        DocumentEntry::new("GKE", "GCP/GKE.md", "fa-solid fa-dharmachakra"),
        DocumentEntry::new("IAM", "GCP/IAM.md", "fa-solid fa-user-shield"),
        DocumentEntry::new("VPC", "GCP/VPC.md", "fa-solid fa-network-wired"),
    ]
}

fn aws_pdf_docs() -> Vec<DocumentEntry> {
    const PDF_ICON: &str = "fa-solid fa-file-pdf";
    vec![
        DocumentEntry::new(
            "AMI Restoration Troubleshooting Guide",
            "AWS/123/AMI_Restoration_Troubleshooting_Guide.pdf",
            PDF_ICON,
        ),
        DocumentEntry::new(
            "AWS Implementation Q&A",
            "AWS/123/AWS_Implementation_QA.pdf",
            PDF_ICON,
        ),
        DocumentEntry::new(
            "AWS Implementation Q&A with Diagrams",
            "AWS/123/AWS_Implementation_QA_with_Diagrams.pdf",
            PDF_ICON,
        ),
        DocumentEntry::new(
            "Cloud DevOps Networking Q&A",
            "AWS/123/Cloud_DevOps_Networking_QA.pdf",
            PDF_ICON,
        ),
        DocumentEntry::new(
            "Cloud Q&A with All Diagrams",
            "AWS/123/Cloud_QA_with_All_Diagrams.pdf",
            PDF_ICON,
        ),
        DocumentEntry::new(
            "Cloud Q&A with Diagrams",
            "AWS/123/Cloud_QA_with_Diagrams.pdf",
            PDF_ICON,
        ),
        DocumentEntry::new(
            "Cloud Q&A with Visual Diagram",
            "AWS/123/Cloud_QA_with_Visual_Diagram.pdf",
            PDF_ICON,
        ),
        DocumentEntry::new(
            "Detailed Cloud DevOps Networking Q&A",
            "AWS/123/Detailed_Cloud_DevOps_Networking_QA.pdf",
            PDF_ICON,
        ),
    ]
}
