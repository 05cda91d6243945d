use pretty_assertions::assert_eq;
use tsgraph_core::graph::{DeclarationKind, TypeKind};
use tsgraph_core::records::{
    ClassRecord, CodeCoordinates, DeclaredTypeRecord, DependencyRecord, ExportKind, ExportRecord,
    ExternalDeclarationRecord, ExternalModuleRecord, MethodRecord, ModuleRecord,
    ParameterPropertyRecord, ParameterRecord, ProjectRecord, PropertyRecord, TypeAliasRecord,
    TypeParameterRecord, TypeRecord, VariableRecord,
};
use tsgraph_core::{DeclId, LinkedGraph, LinkerConfig, ScanInput, TypeId};
use tsgraph_linker::{link, LinkSession};

fn fqn(file: &str, name: &str) -> String {
    format!("\"{file}\".{name}")
}

fn coordinates(file: &str) -> CodeCoordinates {
    CodeCoordinates {
        file_name: file.to_string(),
        ..Default::default()
    }
}

fn module(path: &str) -> ModuleRecord {
    ModuleRecord {
        path: path.to_string(),
        local_fqn: path.to_string(),
        global_fqn: path.to_string(),
    }
}

fn class(file: &str, name: &str) -> ClassRecord {
    ClassRecord {
        local_fqn: name.to_string(),
        global_fqn: fqn(file, name),
        class_name: name.to_string(),
        coordinates: coordinates(file),
        ..Default::default()
    }
}

fn project(path: &str, files: &[&str]) -> ProjectRecord {
    let mut project = ProjectRecord {
        root_path: "/repo".to_string(),
        project_path: path.to_string(),
        source_file_paths: files.iter().map(|file| file.to_string()).collect(),
        ..Default::default()
    };
    project.concepts.modules = files.iter().map(|file| module(file)).collect();
    project
}

fn id(graph: &LinkedGraph, fqn: &str) -> DeclId {
    graph
        .find_by_global_fqn(fqn)
        .unwrap_or_else(|| panic!("no declaration {fqn}"))
}

fn declared_target(graph: &LinkedGraph, ty: TypeId) -> Option<DeclId> {
    match &graph.type_node(ty).unwrap().kind {
        TypeKind::Declared { reference, .. } => reference.target,
        other => panic!("expected declared type, got {other:?}"),
    }
}

fn type_parameter_target(graph: &LinkedGraph, ty: TypeId) -> Option<DeclId> {
    match &graph.type_node(ty).unwrap().kind {
        TypeKind::TypeParameterRef { declaration, .. } => *declaration,
        other => panic!("expected type parameter reference, got {other:?}"),
    }
}

/// Everything observable about a linked graph, keyed by FQN instead of arena index
fn canonical(graph: &LinkedGraph) -> Vec<String> {
    let name = |id: Option<DeclId>| {
        id.and_then(|id| graph.global_fqn_of(id))
            .unwrap_or("<unresolved>")
            .to_string()
    };
    let mut facts = Vec::new();
    for node in &graph.types {
        if let TypeKind::Declared { reference, .. } = &node.kind {
            facts.push(format!("type {} -> {}", reference.fqn, name(reference.target)));
        }
    }
    for edge in &graph.dependencies {
        facts.push(format!(
            "depends {} -> {} x{}",
            name(Some(edge.source)),
            name(Some(edge.target)),
            edge.cardinality
        ));
    }
    for edge in &graph.exports {
        facts.push(format!(
            "export {} {} -> {}",
            name(Some(edge.module)),
            edge.exported_name,
            name(Some(edge.target))
        ));
    }
    for id in graph.declaration_ids() {
        let declaration = graph.declaration(id).unwrap();
        if let Some(parent) = declaration.parent {
            facts.push(format!(
                "declares {} -> {}",
                name(Some(parent)),
                declaration.name
            ));
        }
    }
    facts.sort();
    facts
}

#[test]
fn test_two_module_dependency_scenario() {
    let m1 = "/repo/app/src/m1.ts";
    let m2 = "/repo/app/src/m2.ts";
    let mut app = project("/repo/app", &[m1, m2]);
    app.concepts.class_declarations = vec![class(m1, "X"), class(m2, "Y")];
    app.concepts.dependencies = vec![DependencyRecord::new(fqn(m1, "X"), fqn(m2, "Y"), 2)];

    let graph = link(&LinkerConfig::default(), &ScanInput { projects: vec![app] }).unwrap();

    let (m1, x, m2, y) = (
        id(&graph, m1),
        id(&graph, &fqn(m1, "X")),
        id(&graph, m2),
        id(&graph, &fqn(m2, "Y")),
    );
    assert_eq!(graph.dependency(x, y), Some(2));
    assert_eq!(graph.dependency(m1, y), Some(2));
    assert_eq!(graph.dependency(x, m2), Some(2));
    assert_eq!(graph.dependency(m1, m2), Some(2));
    assert_eq!(graph.dependencies.len(), 4);
    assert_eq!(graph.report.registered_fqns, 4);
}

#[test]
fn test_resolution_is_independent_of_project_order() {
    let a_file = "/repo/a/src/a.ts";
    let b_file = "/repo/b/src/b.ts";

    let mut a = project("/repo/a", &[a_file]);
    let mut a_class = class(a_file, "A");
    a_class.extends_class = Some(DeclaredTypeRecord {
        fqn: fqn(b_file, "B"),
        type_arguments: Vec::new(),
    });
    a.concepts.class_declarations = vec![a_class];
    a.concepts.dependencies = vec![DependencyRecord::new(fqn(a_file, "A"), fqn(b_file, "B"), 1)];

    let mut b = project("/repo/b", &[b_file]);
    let mut b_class = class(b_file, "B");
    b_class.properties = vec![PropertyRecord {
        local_fqn: "B.owner".to_string(),
        global_fqn: fqn(b_file, "B.owner"),
        property_name: "owner".to_string(),
        ty: Some(TypeRecord::declared(fqn(a_file, "A"))),
        coordinates: coordinates(b_file),
        ..Default::default()
    }];
    b.concepts.class_declarations = vec![b_class];
    b.concepts.dependencies = vec![DependencyRecord::new(
        fqn(b_file, "B.owner"),
        fqn(a_file, "A"),
        1,
    )];

    let forward = link(
        &LinkerConfig::default(),
        &ScanInput {
            projects: vec![a.clone(), b.clone()],
        },
    )
    .unwrap();
    let backward = link(
        &LinkerConfig::default(),
        &ScanInput {
            projects: vec![b, a],
        },
    )
    .unwrap();

    assert_eq!(canonical(&forward), canonical(&backward));
    assert_eq!(forward.report.unresolved_references, 0);
    assert_eq!(forward.report.resolved_references, 2);
}

#[test]
fn test_inner_type_parameter_shadows_outer() {
    let file = "/repo/app/src/box.ts";
    let mut app = project("/repo/app", &[file]);
    let mut boxed = class(file, "Box");
    boxed.type_parameters = vec![TypeParameterRecord {
        name: "T".to_string(),
        index: 0,
        constraint: None,
    }];
    boxed.properties = vec![PropertyRecord {
        local_fqn: "Box.value".to_string(),
        global_fqn: fqn(file, "Box.value"),
        property_name: "value".to_string(),
        ty: Some(TypeRecord::type_parameter("T")),
        ..Default::default()
    }];
    boxed.methods = vec![MethodRecord {
        local_fqn: "Box.map".to_string(),
        global_fqn: fqn(file, "Box.map"),
        method_name: "map".to_string(),
        type_parameters: vec![TypeParameterRecord {
            name: "T".to_string(),
            index: 0,
            constraint: None,
        }],
        parameters: vec![ParameterRecord {
            index: 0,
            name: "input".to_string(),
            ty: Some(TypeRecord::type_parameter("T")),
            ..Default::default()
        }],
        return_type: Some(TypeRecord::type_parameter("T")),
        ..Default::default()
    }];
    app.concepts.class_declarations = vec![boxed];

    let graph = link(&LinkerConfig::default(), &ScanInput { projects: vec![app] }).unwrap();

    let class_id = id(&graph, &fqn(file, "Box"));
    let method_id = id(&graph, &fqn(file, "Box.map"));
    let type_parameter_of = |owner: DeclId| {
        graph
            .children(owner)
            .find(|child| {
                matches!(
                    graph.declaration(*child).unwrap().kind,
                    DeclarationKind::TypeParameter { .. }
                )
            })
            .unwrap()
    };
    let outer = type_parameter_of(class_id);
    let inner = type_parameter_of(method_id);
    assert_ne!(outer, inner);

    let property_type = match graph.declaration(id(&graph, &fqn(file, "Box.value"))).unwrap().kind {
        DeclarationKind::Property { ty, .. } => ty,
        ref other => panic!("unexpected kind {other:?}"),
    };
    assert_eq!(type_parameter_target(&graph, property_type), Some(outer));

    let return_type = match graph.declaration(method_id).unwrap().kind {
        DeclarationKind::Method { return_type, .. } => return_type,
        ref other => panic!("unexpected kind {other:?}"),
    };
    assert_eq!(type_parameter_target(&graph, return_type), Some(inner));

    let parameter = graph
        .children(method_id)
        .find(|child| graph.declaration(*child).unwrap().name == "input")
        .unwrap();
    let parameter_type = match graph.declaration(parameter).unwrap().kind {
        DeclarationKind::Parameter { ty, .. } => ty,
        ref other => panic!("unexpected kind {other:?}"),
    };
    assert_eq!(type_parameter_target(&graph, parameter_type), Some(inner));
}

#[test]
fn test_type_parameter_visible_in_own_constraint() {
    let file = "/repo/app/src/tree.ts";
    let mut app = project("/repo/app", &[file]);
    app.concepts.type_alias_declarations = vec![TypeAliasRecord {
        local_fqn: "Tree".to_string(),
        global_fqn: fqn(file, "Tree"),
        type_alias_name: "Tree".to_string(),
        type_parameters: vec![TypeParameterRecord {
            name: "T".to_string(),
            index: 0,
            constraint: Some(TypeRecord::Declared(DeclaredTypeRecord {
                fqn: fqn(file, "Tree"),
                type_arguments: vec![TypeRecord::type_parameter("T")],
            })),
        }],
        ty: Some(TypeRecord::type_parameter("T")),
        coordinates: coordinates(file),
    }];

    let graph = link(&LinkerConfig::default(), &ScanInput { projects: vec![app] }).unwrap();

    let alias = id(&graph, &fqn(file, "Tree"));
    let parameter = graph.children(alias).next().unwrap();
    let constraint = match graph.declaration(parameter).unwrap().kind {
        DeclarationKind::TypeParameter {
            constraint: Some(constraint),
            ..
        } => constraint,
        ref other => panic!("unexpected kind {other:?}"),
    };
    assert_eq!(declared_target(&graph, constraint), Some(alias));
    let argument = match &graph.type_node(constraint).unwrap().kind {
        TypeKind::Declared { type_arguments, .. } => type_arguments[0],
        other => panic!("unexpected type {other:?}"),
    };
    assert_eq!(type_parameter_target(&graph, argument), Some(parameter));
}

#[test]
fn test_unresolved_reference_is_not_an_error() {
    let file = "/repo/app/src/main.ts";
    let mut app = project("/repo/app", &[file]);
    app.concepts.variable_declarations = vec![VariableRecord {
        local_fqn: "pending".to_string(),
        global_fqn: fqn(file, "pending"),
        variable_name: "pending".to_string(),
        kind: "const".to_string(),
        ty: Some(TypeRecord::declared("\"/lib/lib.es5.d.ts\".Promise")),
        coordinates: coordinates(file),
        ..Default::default()
    }];

    let graph = link(&LinkerConfig::default(), &ScanInput { projects: vec![app] }).unwrap();

    let variable = id(&graph, &fqn(file, "pending"));
    let ty = match graph.declaration(variable).unwrap().kind {
        DeclarationKind::Variable { ty, .. } => ty,
        ref other => panic!("unexpected kind {other:?}"),
    };
    assert_eq!(declared_target(&graph, ty), None);
    assert_eq!(graph.report.unresolved_references, 1);
}

#[test]
fn test_missing_sub_project_aborts_session() {
    let mut p2 = project("/repo/p2", &[]);
    p2.sub_project_paths = vec!["/repo/never-scanned".to_string()];

    let err = LinkSession::new(LinkerConfig::default())
        .link(&ScanInput {
            projects: vec![project("/repo/p1", &[]), p2],
        })
        .unwrap_err();

    assert!(err.is_fatal_link_error());
}

#[test]
fn test_sub_project_reference_links_projects() {
    let mut app = project("/repo/app", &[]);
    app.sub_project_paths = vec!["/repo/lib".to_string()];
    let lib = project("/repo/lib", &[]);

    let graph = link(
        &LinkerConfig::default(),
        &ScanInput {
            projects: vec![app, lib],
        },
    )
    .unwrap();

    assert_eq!(graph.projects[0].config_file_path, "/repo/app/tsconfig.json");
    assert_eq!(graph.projects[0].references.len(), 1);
    assert_eq!(graph.projects[0].references[0].index(), 1);
    assert_eq!(graph.report.project_references, 1);
}

#[test]
fn test_no_self_dependency_from_own_subtree() {
    let file = "/repo/app/src/service.ts";
    let mut app = project("/repo/app", &[file]);
    let mut service = class(file, "Service");
    service.methods = vec![MethodRecord {
        local_fqn: "Service.run".to_string(),
        global_fqn: fqn(file, "Service.run"),
        method_name: "run".to_string(),
        ..Default::default()
    }];
    app.concepts.class_declarations = vec![service];
    app.concepts.dependencies = vec![
        DependencyRecord::new(fqn(file, "Service.run"), fqn(file, "Service"), 1),
        DependencyRecord::new(fqn(file, "Service"), fqn(file, "Service.run"), 2),
        DependencyRecord::new(fqn(file, "Service"), fqn(file, "Service"), 1),
    ];

    let graph = link(&LinkerConfig::default(), &ScanInput { projects: vec![app] }).unwrap();

    assert!(graph
        .dependencies
        .iter()
        .all(|edge| edge.source != edge.target));
    let class_id = id(&graph, &fqn(file, "Service"));
    let method_id = id(&graph, &fqn(file, "Service.run"));
    assert_eq!(graph.dependency(method_id, class_id), Some(1));
    assert_eq!(graph.dependency(class_id, method_id), Some(2));
}

#[test]
fn test_duplicate_fqn_keeps_first_declaration() {
    let file = "/repo/app/src/dup.ts";
    let mut app = project("/repo/app", &[file]);
    let mut second = class(file, "Dup");
    second.is_abstract = true;
    app.concepts.class_declarations = vec![class(file, "Dup"), second];

    let graph = link(&LinkerConfig::default(), &ScanInput { projects: vec![app] }).unwrap();

    assert_eq!(graph.report.duplicate_fqns, 1);
    let first = id(&graph, &fqn(file, "Dup"));
    assert!(matches!(
        graph.declaration(first).unwrap().kind,
        DeclarationKind::Class {
            is_abstract: false,
            ..
        }
    ));
}

#[test]
fn test_exports_use_alias_and_skip_namespaces() {
    let index = "/repo/app/src/index.ts";
    let widget = "/repo/app/src/widget.ts";
    let mut app = project("/repo/app", &[index, widget]);
    app.concepts.class_declarations = vec![class(widget, "Widget")];
    app.concepts.export_declarations = vec![
        ExportRecord {
            identifier: "Widget".to_string(),
            alias: Some("DefaultWidget".to_string()),
            global_decl_fqn: Some(fqn(widget, "Widget")),
            source_file_path_absolute: index.to_string(),
            ..Default::default()
        },
        ExportRecord {
            identifier: "*".to_string(),
            kind: ExportKind::Namespace,
            import_source: Some("./widget".to_string()),
            source_file_path_absolute: index.to_string(),
            ..Default::default()
        },
    ];

    let graph = link(&LinkerConfig::default(), &ScanInput { projects: vec![app] }).unwrap();

    assert_eq!(graph.exports.len(), 1);
    assert_eq!(graph.exports[0].module, id(&graph, index));
    assert_eq!(graph.exports[0].target, id(&graph, &fqn(widget, "Widget")));
    assert_eq!(graph.exports[0].exported_name, "DefaultWidget");
    assert_eq!(graph.report.skipped_namespace_exports, 1);
    assert_eq!(graph.report.unresolved_exports, 0);
}

#[test]
fn test_external_module_shared_between_projects() {
    let external = ExternalModuleRecord {
        global_fqn: "lodash".to_string(),
        local_fqn: Some("lodash".to_string()),
        declarations: vec![ExternalDeclarationRecord {
            global_fqn: "\"lodash\".debounce".to_string(),
            name: "debounce".to_string(),
        }],
    };
    let mut a = project("/repo/a", &[]);
    a.concepts.external_modules = vec![external.clone()];
    let mut b = project("/repo/b", &[]);
    b.concepts.external_modules = vec![external];

    let graph = link(
        &LinkerConfig::default(),
        &ScanInput {
            projects: vec![a, b],
        },
    )
    .unwrap();

    let module = id(&graph, "lodash");
    assert_eq!(graph.projects[0].external_modules, vec![module]);
    assert_eq!(graph.projects[1].external_modules, vec![module]);
    assert_eq!(graph.exports.len(), 1);
    assert_eq!(graph.exports[0].exported_name, "debounce");
    assert_eq!(graph.report.duplicate_fqns, 0);
}

#[test]
fn test_modules_adopt_only_scanned_files() {
    let scanned = "/repo/app/src/scanned.ts";
    let generated = "/repo/app/gen/generated.ts";
    let mut app = project("/repo/app", &[scanned]);
    app.concepts.modules.push(module(generated));
    app.concepts.class_declarations = vec![class(scanned, "Kept"), class(generated, "Orphan")];

    let graph = link(&LinkerConfig::default(), &ScanInput { projects: vec![app] }).unwrap();

    let module_id = id(&graph, scanned);
    assert!(graph.find_by_global_fqn(generated).is_none());
    assert_eq!(graph.projects[0].modules, vec![module_id]);
    assert_eq!(
        graph.declaration(id(&graph, &fqn(scanned, "Kept"))).unwrap().parent,
        Some(module_id)
    );
    assert_eq!(
        graph.declaration(id(&graph, &fqn(generated, "Orphan"))).unwrap().parent,
        None
    );
}

#[test]
fn test_parameter_properties_become_class_properties() {
    let file = "/repo/app/src/user.ts";
    let mut app = project("/repo/app", &[file]);
    let mut user = class(file, "User");
    user.constructor = Some(tsgraph_core::records::ConstructorRecord {
        local_fqn: "User.constructor".to_string(),
        global_fqn: fqn(file, "User.constructor"),
        parameter_properties: vec![ParameterPropertyRecord {
            local_fqn: "User.name".to_string(),
            global_fqn: fqn(file, "User.name"),
            index: 0,
            property_name: "name".to_string(),
            readonly: true,
            ty: Some(TypeRecord::primitive("string")),
            ..Default::default()
        }],
        ..Default::default()
    });
    app.concepts.class_declarations = vec![user];

    let graph = link(&LinkerConfig::default(), &ScanInput { projects: vec![app] }).unwrap();

    let class_id = id(&graph, &fqn(file, "User"));
    let property = graph.declaration(id(&graph, &fqn(file, "User.name"))).unwrap();
    assert_eq!(property.parent, Some(class_id));
    assert!(matches!(
        property.kind,
        DeclarationKind::Property {
            readonly: true,
            parameter_index: Some(0),
            ..
        }
    ));
}

#[test]
fn test_link_decoded_json_input() {
    let json = r#"{
        "projects": [{
            "rootPath": "/repo",
            "projectPath": "/repo/app",
            "sourceFilePaths": ["/repo/app/src/a.ts"],
            "concepts": {
                "modules": [{
                    "path": "/repo/app/src/a.ts",
                    "localFqn": "./src/a.ts",
                    "globalFqn": "/repo/app/src/a.ts"
                }],
                "functionDeclarations": [{
                    "localFqn": "\"./src/a.ts\".make",
                    "globalFqn": "\"/repo/app/src/a.ts\".make",
                    "functionName": "make",
                    "typeParameters": [{ "name": "T", "index": 0 }],
                    "returnType": {
                        "type": "function",
                        "typeParameters": [{ "name": "U", "index": 0 }],
                        "parameters": [{ "index": 0, "name": "u", "type": { "type": "type-parameter", "name": "U" } }],
                        "returnType": { "type": "type-parameter", "name": "T" }
                    },
                    "coordinates": { "fileName": "/repo/app/src/a.ts", "startLine": 1 }
                }]
            }
        }]
    }"#;

    let input = ScanInput::from_json_str(json).unwrap();
    let graph = link(&LinkerConfig::default(), &input).unwrap();

    let function = id(&graph, "\"/repo/app/src/a.ts\".make");
    assert_eq!(
        graph.declaration(function).unwrap().parent,
        Some(id(&graph, "/repo/app/src/a.ts"))
    );
    let unresolved_type_parameters = graph
        .types
        .iter()
        .filter(|node| {
            matches!(
                node.kind,
                TypeKind::TypeParameterRef {
                    declaration: None,
                    ..
                }
            )
        })
        .count();
    assert_eq!(unresolved_type_parameters, 0);
}

#[test]
fn test_dependency_on_external_declaration_stays_put() {
    let file = "/repo/app/src/a.ts";
    let mut app = project("/repo/app", &[file]);
    app.concepts.class_declarations = vec![class(file, "X")];
    app.concepts.external_modules = vec![ExternalModuleRecord {
        global_fqn: "react".to_string(),
        local_fqn: Some("react".to_string()),
        declarations: vec![ExternalDeclarationRecord {
            global_fqn: "\"react\".useState".to_string(),
            name: "useState".to_string(),
        }],
    }];
    app.concepts.dependencies = vec![DependencyRecord::new(
        fqn(file, "X"),
        "\"react\".useState",
        1,
    )];

    let graph = link(&LinkerConfig::default(), &ScanInput { projects: vec![app] }).unwrap();

    let x = id(&graph, &fqn(file, "X"));
    let module = id(&graph, file);
    let react = id(&graph, "react");
    let use_state = id(&graph, "\"react\".useState");

    assert_eq!(graph.declaration(use_state).unwrap().parent, None);
    assert_eq!(graph.exports.len(), 1);
    assert_eq!(graph.exports[0].module, react);
    assert_eq!(graph.exports[0].target, use_state);

    assert_eq!(graph.dependency(x, use_state), Some(1));
    assert_eq!(graph.dependency(module, use_state), Some(1));
    assert_eq!(graph.dependency(x, react), None);
    assert_eq!(graph.dependency(module, react), None);
    assert_eq!(graph.dependencies.len(), 2);
}

#[test]
fn test_each_module_adopts_declarations_of_its_file() {
    let first = "/repo/app/src/first.ts";
    let second = "/repo/app/src/second.ts";
    let mut app = project("/repo/app", &[first, second]);
    app.concepts.class_declarations = vec![
        class(second, "B1"),
        class(first, "A"),
        class(second, "B2"),
    ];

    let graph = link(&LinkerConfig::default(), &ScanInput { projects: vec![app] }).unwrap();

    let first_module = id(&graph, first);
    let second_module = id(&graph, second);
    assert_eq!(
        graph.children(first_module).collect::<Vec<_>>(),
        vec![id(&graph, &fqn(first, "A"))]
    );
    assert_eq!(
        graph.children(second_module).collect::<Vec<_>>(),
        vec![id(&graph, &fqn(second, "B1")), id(&graph, &fqn(second, "B2"))]
    );
}
