use std::{error::Error, io::Read, path::Path};

use nodepatch::{Node, resolve::find_matches};

use crate::cli::{OutputFormat, QueryArgs};

pub fn handle_query_command(args: QueryArgs) -> Result<(), Box<dyn Error>> {
    let doc = match &args.file {
        Some(file_path) => load_document(file_path)?,
        None => read_from_stdin()?,
    };

    let matches = find_matches(&doc, &args.path)?;
    let Some(node) = matches.first().and_then(|location| doc.get(location)) else {
        return Err(format!("nothing found at '{}'", args.path).into());
    };

    print_node(node, args.output)?;
    Ok(())
}

pub(super) fn load_document(path: &Path) -> Result<Node, Box<dyn Error>> {
    let data = std::fs::read_to_string(path)?;
    Ok(Node::from_yaml_str(&data)?)
}

pub(super) fn read_from_stdin() -> Result<Node, Box<dyn Error>> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(Node::from_yaml_str(&buffer)?)
}

pub(super) fn print_node(node: &Node, output: OutputFormat) -> Result<(), Box<dyn Error>> {
    match output {
        OutputFormat::Yaml => print!("{}", node.to_yaml_string()?),
        OutputFormat::Json => println!("{}", node.to_json_string()?),
    }
    Ok(())
}
