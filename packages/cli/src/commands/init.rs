use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use rulecraft_export::ExportFormat;
use rulecraft_model::{
    Combinator, Condition, FieldCatalog, FieldDef, FieldOption, FieldType, Group, Operator, RuleTree, RuleValue,
    SavedQuery,
};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Formats to emit on compile (defaults to readable, sql, mongo)
    #[arg(short, long)]
    pub emit: Vec<ExportFormat>,

    /// Directory for rule tree files
    #[arg(short, long, default_value = "queries")]
    pub queries_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<bool> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(true);
    }

    println!("{}", "📝 Initializing Rulecraft project...".bright_blue().bold());

    let mut config = Config::default();
    if !args.emit.is_empty() {
        config.emit = args.emit.clone();
    }

    let catalog_path = config.catalog_path(cwd);
    if !catalog_path.exists() {
        fs::write(&catalog_path, serde_json::to_string_pretty(&example_catalog())?)?;
        println!("  {} Created {}", "✓".green(), config.catalog);
    }

    let queries_dir = cwd.join(&args.queries_dir);
    if !queries_dir.exists() {
        fs::create_dir_all(&queries_dir)?;
        println!("  {} Created {}/", "✓".green(), args.queries_dir);
    }

    let example_file = queries_dir.join("example.json");
    if !example_file.exists() {
        let example = SavedQuery::new("Adult customers", example_tree())
            .with_description("Customers over 18 who are active or premium");
        fs::write(&example_file, example.to_json()?)?;
        println!("  {} Created {}/example.json", "✓".green(), args.queries_dir);
    }

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/example.json", args.queries_dir);
    println!("  2. Run: rulecraft lint {}", args.queries_dir);
    println!("  3. Run: rulecraft compile {}", args.queries_dir);

    Ok(true)
}

fn example_catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
        FieldDef::new("age", "Age", FieldType::Number),
        FieldDef::new("name", "Name", FieldType::String),
        FieldDef::new("status", "Status", FieldType::Select).with_options([
            FieldOption::new("active", "Active"),
            FieldOption::new("inactive", "Inactive"),
        ]),
        FieldDef::new("premium", "Premium", FieldType::Boolean),
        FieldDef::new("signup", "Signup date", FieldType::Date),
    ])
}

fn example_tree() -> RuleTree {
    RuleTree::new(Group::new("root", Combinator::And).with_children([
        Condition::new("c1", "age", Operator::GreaterThan, 18).into(),
        Group::new("g1", Combinator::Or)
            .with_children([
                Condition::new("c2", "status", Operator::Equals, "active").into(),
                Condition::new("c3", "premium", Operator::IsTrue, RuleValue::Null).into(),
            ])
            .into(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulecraft_linter::{lint_tree, LintOptions};

    fn args() -> InitArgs {
        InitArgs {
            emit: vec![],
            queries_dir: "queries".to_string(),
            force: false,
        }
    }

    #[test]
    fn test_example_tree_is_clean() {
        let diagnostics = lint_tree(&example_tree(), &example_catalog(), &LintOptions::default());
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn test_init_writes_project() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut args = args();
        args.emit = vec![ExportFormat::Sql];
        assert!(init(args, root).unwrap());

        let config = Config::load(root).unwrap();
        assert_eq!(config.emit, vec![ExportFormat::Sql]);
        assert!(root.join("fields.json").exists());

        let saved = SavedQuery::from_json(&fs::read_to_string(root.join("queries/example.json")).unwrap()).unwrap();
        assert_eq!(saved.tree, example_tree());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(DEFAULT_CONFIG_NAME), r#"{ "catalog": "mine.json" }"#).unwrap();
        assert!(init(args(), root).unwrap());
        assert_eq!(Config::load(root).unwrap().catalog, "mine.json");
        assert!(!root.join("queries").exists());
    }
}
