use ragroute_domain::{
	CATALOG, Category, Document, PromptKey, RelevanceScore, RelevanceVerdict, RouteDecision,
	document,
};

#[test]
fn catalog_is_ordered_and_complete() {
	let names: Vec<&str> = CATALOG.iter().map(|category| category.as_str()).collect();

	assert_eq!(names, ["policy", "subject", "admission", "book", "seteuk"]);
}

#[test]
fn grader_accepts_only_literal_tokens() {
	assert_eq!(RelevanceVerdict::parse("1"), RelevanceVerdict::Relevant);
	assert_eq!(RelevanceVerdict::parse(" 0\n"), RelevanceVerdict::Irrelevant);

	for raw in ["yes", "1.", "관련 있음: 1", "", "10", "true"] {
		let verdict = RelevanceVerdict::parse(raw);

		assert_eq!(verdict, RelevanceVerdict::Unparseable(raw.to_string()));
		assert_eq!(verdict.score(), RelevanceScore::Zero);
		assert!(!verdict.is_relevant());
	}
}

#[test]
fn router_output_maps_to_closed_variants() {
	assert_eq!(RouteDecision::parse("search_policy"), RouteDecision::Category(Category::Policy));
	assert_eq!(RouteDecision::parse("llm_fallback"), RouteDecision::Fallback);
	assert_eq!(
		RouteDecision::parse("{\"tool\":\"search_seteuk\"}"),
		RouteDecision::Category(Category::Seteuk)
	);
	assert!(matches!(RouteDecision::parse("I think policy fits"), RouteDecision::Unparseable(_)));
	assert_eq!(RouteDecision::parse(""), RouteDecision::Unparseable(String::new()));
}

#[test]
fn sentinel_document_is_marked() {
	let sentinel = Document::no_evidence(Category::Book);

	assert!(sentinel.is_sentinel());
	assert_eq!(sentinel.content, "관련 도서 정보를 찾을 수 없습니다.");
	assert_eq!(sentinel.metadata.get("category").map(String::as_str), Some("book"));
	assert!(!Document::new("도서 추천 목록").is_sentinel());
}

#[test]
fn preview_truncates_each_document_by_grapheme() {
	let docs = vec![Document::new("경영학과 소개 자료"), Document::new("abc")];
	let rendered = document::preview(&docs, 4);

	assert_eq!(rendered, "경영학과\n\nabc");
}

#[test]
fn generation_rendering_includes_metadata() {
	let docs = vec![Document::new("본문 내용").with_metadata("source", "guide.pdf")];
	let rendered = document::render_for_generation(&docs);

	assert!(rendered.contains("본문: 본문 내용"));
	assert!(rendered.contains("source=guide.pdf"));
}

#[test]
fn prompt_keys_serialize_as_labels() {
	assert_eq!(PromptKey::Category(Category::Admission).as_str(), "admission");
	assert_eq!(
		serde_json::to_value(PromptKey::Fallback).expect("Failed to serialize prompt key."),
		serde_json::json!("fallback")
	);
	assert!(PromptKey::Fallback.is_fallback());
}
