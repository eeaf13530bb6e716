use std::fmt::Write;

use canonpkg_lib::TypedPackage;
use canonpkg_lib::types::{DeclKind, PackageSummary};

use super::LookupArgs;
use super::session::{new_registry, report_failure};

pub struct DescribeArgs {
    pub import_path: String,
    pub json: bool,
    pub lookup: LookupArgs,
}

pub fn run(args: DescribeArgs) {
    let registry = new_registry(&args.lookup);
    let package = match registry.load_path(&args.import_path) {
        Ok(package) => package,
        Err(failure) => {
            report_failure(&failure, args.lookup.color);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&package.summary()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: failed to serialize summary: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render_text(&package));
    }
}

/// One line per declaration, methods indented under their type.
pub fn render_text(package: &TypedPackage) -> String {
    let mut out = String::new();
    write_text(&mut out, &package.summary()).expect("String write never fails");
    out
}

fn write_text(w: &mut impl Write, summary: &PackageSummary) -> std::fmt::Result {
    writeln!(w, "package {} ({})", summary.name, summary.key)?;
    for import in &summary.imports {
        writeln!(w, "import {}", import)?;
    }
    for decl in &summary.decls {
        let marker = if decl.exported { "" } else { "  (unexported)" };
        match decl.kind {
            DeclKind::Func => {
                let signature = decl.ty.strip_prefix("func").unwrap_or(&decl.ty);
                writeln!(w, "func {}{}{}", decl.name, signature, marker)?;
            }
            kind => writeln!(w, "{} {} {}{}", kind, decl.name, decl.ty, marker)?,
        }
        for method in &decl.methods {
            writeln!(w, "    method {}", method)?;
        }
    }
    Ok(())
}
