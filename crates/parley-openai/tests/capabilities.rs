use serde_json::json;

use parley_openai::capabilities::{
    CapabilityDeclaration, DOCUMENT_SEARCH_MAX_RESULTS, IMAGE_TOOL_NAME, active_capabilities,
};

#[test]
fn only_image_generation_without_toggle_or_index() {
    let caps = active_capabilities(false, None);
    assert_eq!(caps.len(), 1);
    assert!(matches!(
        &caps[0],
        CapabilityDeclaration::ImageGeneration { name, .. } if name == IMAGE_TOOL_NAME
    ));
}

#[test]
fn all_three_in_fixed_order() {
    let caps = active_capabilities(true, Some("vs_abc"));
    assert_eq!(
        caps,
        vec![
            CapabilityDeclaration::WebSearch,
            CapabilityDeclaration::DocumentSearch {
                index_id: "vs_abc".to_string(),
                max_results: DOCUMENT_SEARCH_MAX_RESULTS,
            },
            CapabilityDeclaration::image_generation(),
        ]
    );
}

#[test]
fn document_search_alone_precedes_image_generation() {
    let caps = active_capabilities(false, Some("vs_abc"));
    assert_eq!(caps.len(), 2);
    assert!(matches!(caps[0], CapabilityDeclaration::DocumentSearch { .. }));
    assert!(matches!(caps[1], CapabilityDeclaration::ImageGeneration { .. }));
}

#[test]
fn image_declaration_is_stable_across_turns() {
    let a = active_capabilities(true, None).pop().unwrap();
    let b = active_capabilities(false, Some("vs_1")).pop().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_tool(), b.to_tool());
}

#[test]
fn image_tool_schema() {
    let tool = CapabilityDeclaration::image_generation().to_tool();

    assert_eq!(tool["type"], "function");
    assert_eq!(tool["name"], "generate_image");
    assert_eq!(tool["parameters"]["required"], json!(["prompt"]));
    assert_eq!(
        tool["parameters"]["properties"]["size"]["enum"],
        json!(["1024x1024", "1536x1024", "1024x1536"])
    );
    assert_eq!(tool["parameters"]["properties"]["prompt"]["type"], "string");
}

#[test]
fn wire_shapes() {
    assert_eq!(
        CapabilityDeclaration::WebSearch.to_tool(),
        json!({ "type": "web_search" })
    );
    assert_eq!(
        CapabilityDeclaration::DocumentSearch {
            index_id: "vs_9".to_string(),
            max_results: 8
        }
        .to_tool(),
        json!({ "type": "file_search", "vector_store_ids": ["vs_9"], "max_num_results": 8 })
    );
}
