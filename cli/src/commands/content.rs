use anyhow::{Context, Result};
use clap::Subcommand;
use folio_store::{NewCertificate, NewProject, PortfolioStore};

#[derive(Subcommand, Debug, PartialEq)]
pub enum ProjectCommands {
    /// List projects, newest first
    List,
    /// Add a project
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        link: Option<String>,
        /// Repeat for multiple tags
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Remove a project by id
    Remove { id: i64 },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum CertificateCommands {
    /// List certificates, newest first
    List,
    /// Add a certificate
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        issuer: String,
        #[arg(long)]
        issued_on: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        credential: Option<String>,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ContactCommands {
    /// List received contact messages, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

impl ProjectCommands {
    pub async fn run(self, store: &dyn PortfolioStore) -> Result<()> {
        match self {
            ProjectCommands::List => {
                let projects = store.list_projects().await.context("failed to list projects")?;
                if projects.is_empty() {
                    println!("No projects");
                }
                for project in projects {
                    let tags = if project.tags.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", project.tags.join(", "))
                    };
                    println!("{:>4}  {}{}", project.id, project.title, tags);
                }
            }
            ProjectCommands::Add {
                title,
                description,
                image,
                link,
                tags,
            } => {
                let project = NewProject {
                    title,
                    description,
                    image_url: image,
                    link_url: link,
                    tags: normalize_tags(tags),
                };
                let created = store
                    .create_project(&project)
                    .await
                    .context("failed to add project")?;
                println!("✓ Added project {} ({})", created.id, created.title);
            }
            ProjectCommands::Remove { id } => {
                store
                    .delete_project(id)
                    .await
                    .with_context(|| format!("failed to remove project {id}"))?;
                println!("✓ Removed project {id}");
            }
        }
        Ok(())
    }
}

impl CertificateCommands {
    pub async fn run(self, store: &dyn PortfolioStore) -> Result<()> {
        match self {
            CertificateCommands::List => {
                let certificates = store
                    .list_certificates()
                    .await
                    .context("failed to list certificates")?;
                if certificates.is_empty() {
                    println!("No certificates");
                }
                for certificate in certificates {
                    let issued = certificate
                        .issued_on
                        .map(|date| format!(" ({date})"))
                        .unwrap_or_default();
                    println!(
                        "{:>4}  {} by {}{}",
                        certificate.id, certificate.title, certificate.issuer, issued
                    );
                }
            }
            CertificateCommands::Add {
                title,
                issuer,
                issued_on,
                image,
                credential,
            } => {
                let certificate = NewCertificate {
                    title,
                    issuer,
                    issued_on,
                    image_url: image,
                    credential_url: credential,
                };
                let created = store
                    .create_certificate(&certificate)
                    .await
                    .context("failed to add certificate")?;
                println!("✓ Added certificate {} ({})", created.id, created.title);
            }
        }
        Ok(())
    }
}

impl ContactCommands {
    pub async fn run(self, store: &dyn PortfolioStore) -> Result<()> {
        match self {
            ContactCommands::List { limit } => {
                let messages = store
                    .list_contacts(limit)
                    .await
                    .context("failed to list contact messages")?;
                if messages.is_empty() {
                    println!("No contact messages");
                }
                for message in messages {
                    println!(
                        "{:>4}  {}  {:<7}  {} <{}>: {}",
                        message.id,
                        message.created_at.format("%Y-%m-%d %H:%M"),
                        message.relay_status.as_str(),
                        message.name,
                        message.email,
                        preview(&message.message, 60)
                    );
                }
            }
        }
        Ok(())
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

/// First line of `text`, cut to `max_chars` characters.
fn preview(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let cut: String = line.chars().take(max_chars).collect();
    format!("{cut}…")
}
