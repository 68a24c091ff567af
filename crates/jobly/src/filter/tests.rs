use super::*;

fn filters(pairs: &[(&str, FilterValue)]) -> FilterRequest {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// ==================== Companies ====================

#[test]
fn test_company_three_filters() {
    let raw = filters(&[
        ("minEmployees", 45.into()),
        ("maxEmployees", 90.into()),
        ("name", "Limited".into()),
    ]);
    let filter = build_filter_clause(&raw, &COMPANY_FILTERS).unwrap();
    assert_eq!(
        filter.clause,
        "WHERE num_employees > $1 AND num_employees < $2 AND LOWER(name) ILIKE $3"
    );
    assert_eq!(
        filter.values,
        vec![
            BoundValue::Int(45),
            BoundValue::Int(90),
            BoundValue::from("%limited%")
        ]
    );
}

#[test]
fn test_company_single_filter_ignores_unknown_keys() {
    let raw = filters(&[
        ("minEmployees", 45.into()),
        ("jhhjjh", 90.into()),
        ("hjjhjh", "Limited".into()),
    ]);
    let filter = build_filter_clause(&raw, &COMPANY_FILTERS).unwrap();
    assert_eq!(filter.clause, "WHERE num_employees > $1");
    assert!(!filter.clause.contains("AND"));
    assert_eq!(filter.values, vec![BoundValue::Int(45)]);
}

#[test]
fn test_unknown_key_never_rendered() {
    let raw = filters(&[("foo", 1.into()), ("minEmployees", 5.into())]);
    let filter = build_filter_clause(&raw, &COMPANY_FILTERS).unwrap();
    assert_eq!(filter.clause, "WHERE num_employees > $1");
    assert_eq!(filter.values, vec![BoundValue::Int(5)]);
    assert!(!filter.clause.contains("foo"));
}

#[test]
fn test_no_filters() {
    assert_eq!(build_filter_clause(&FilterRequest::new(), &COMPANY_FILTERS), None);
    assert_eq!(build_filter_clause(&FilterRequest::new(), &JOB_FILTERS), None);
}

#[test]
fn test_only_unknown_keys() {
    let raw = filters(&[("color", "blue".into()), ("limit", 10.into())]);
    assert_eq!(build_filter_clause(&raw, &COMPANY_FILTERS), None);
}

#[test]
fn test_declared_order_wins_over_arrival_order() {
    let mut raw = FilterRequest::new();
    raw.insert("name", "net").insert("maxEmployees", 200);
    let filter = build_filter_clause(&raw, &COMPANY_FILTERS).unwrap();
    assert_eq!(
        filter.clause,
        "WHERE num_employees < $1 AND LOWER(name) ILIKE $2"
    );
    assert_eq!(
        filter.values,
        vec![BoundValue::Int(200), BoundValue::from("%net%")]
    );
}

#[test]
fn test_name_match_is_case_insensitive() {
    let upper = filters(&[("name", "DEV".into())]);
    let lower = filters(&[("name", "dev".into())]);
    let a = build_filter_clause(&upper, &COMPANY_FILTERS).unwrap();
    let b = build_filter_clause(&lower, &COMPANY_FILTERS).unwrap();
    assert_eq!(a.values, vec![BoundValue::from("%dev%")]);
    assert_eq!(a, b);
}

#[test]
fn test_query_string_values_pass_through() {
    let raw = FilterRequest::from_query_pairs([("minEmployees", "10"), ("name", "Ac")]);
    let filter = build_filter_clause(&raw, &COMPANY_FILTERS).unwrap();
    assert_eq!(
        filter.values,
        vec![BoundValue::from("10"), BoundValue::from("%ac%")]
    );
}

// ==================== Jobs ====================

#[test]
fn test_jobs_three_filters_renumbers_after_flag() {
    let raw = filters(&[
        ("minSalary", 50000.into()),
        ("hasEquity", true.into()),
        ("title", "Analyst".into()),
    ]);
    let filter = build_filter_clause(&raw, &JOB_FILTERS).unwrap();
    assert_eq!(
        filter.clause,
        "WHERE salary >= $1 AND equity IS NOT NULL AND LOWER(title) ILIKE $2"
    );
    assert_eq!(
        filter.values,
        vec![BoundValue::Int(50000), BoundValue::from("%analyst%")]
    );
    // one value per placeholder, no gaps
    assert_eq!(filter.values.len(), filter.clause.matches('$').count());
}

#[test]
fn test_jobs_single_filter() {
    let raw = filters(&[
        ("minSalary", 50000.into()),
        ("jhhjjh", 90.into()),
        ("hjjhjh", "Limited".into()),
    ]);
    let filter = build_filter_clause(&raw, &JOB_FILTERS).unwrap();
    assert_eq!(filter.clause, "WHERE salary >= $1");
    assert_eq!(filter.values, vec![BoundValue::Int(50000)]);
}

#[test]
fn test_has_equity_alone_binds_nothing() {
    let raw = filters(&[("hasEquity", true.into())]);
    let filter = build_filter_clause(&raw, &JOB_FILTERS).unwrap();
    assert_eq!(filter.clause, "WHERE equity IS NOT NULL");
    assert!(filter.values.is_empty());
    assert_eq!(filter.next_placeholder(), 1);
}

#[test]
fn test_has_equity_false_is_omitted() {
    let raw = filters(&[("hasEquity", false.into())]);
    assert_eq!(build_filter_clause(&raw, &JOB_FILTERS), None);

    let raw = filters(&[("hasEquity", false.into()), ("title", "eng".into())]);
    let filter = build_filter_clause(&raw, &JOB_FILTERS).unwrap();
    assert_eq!(filter.clause, "WHERE LOWER(title) ILIKE $1");
    assert_eq!(filter.values, vec![BoundValue::from("%eng%")]);
}

#[test]
fn test_has_equity_from_query_string() {
    let raw = FilterRequest::from_query_pairs([("hasEquity", "true"), ("title", "J")]);
    let filter = build_filter_clause(&raw, &JOB_FILTERS).unwrap();
    assert_eq!(
        filter.clause,
        "WHERE equity IS NOT NULL AND LOWER(title) ILIKE $1"
    );
}

#[test]
fn test_offset_numbering() {
    let raw = filters(&[("minSalary", 1.into()), ("title", "x".into())]);
    let filter = build_filter_clause_from(&raw, &JOB_FILTERS, 2).unwrap();
    assert_eq!(
        filter.clause,
        "WHERE salary >= $3 AND LOWER(title) ILIKE $4"
    );
    assert_eq!(filter.next_placeholder(), 5);
    assert_eq!(filter.params_ref().len(), 2);
}

// ==================== Specs & typed queries ====================

#[test]
fn test_spec_keys_in_declared_order() {
    let keys: Vec<_> = JOB_FILTERS.keys().collect();
    assert_eq!(keys, vec!["minSalary", "hasEquity", "title"]);
    assert!(COMPANY_FILTERS.recognizes("maxEmployees"));
    assert!(!COMPANY_FILTERS.recognizes("title"));
}

#[test]
fn test_spec_entities_name_their_tables() {
    assert_eq!(JOB_FILTERS.entity, "jobs");
    assert_eq!(COMPANY_FILTERS.entity, "companies");
}

#[test]
fn test_filter_request_keys_sorted() {
    let raw = FilterRequest::from_query_pairs([("title", "a"), ("hasEquity", "true")]);
    assert_eq!(raw.keys().collect::<Vec<_>>(), ["hasEquity", "title"]);
}

#[test]
fn test_job_query_deserialize() {
    let q: JobQuery =
        serde_json::from_str(r#"{"minSalary": 100, "hasEquity": true, "color": "red"}"#).unwrap();
    assert_eq!(q.min_salary, Some(FilterValue::Int(100)));
    assert_eq!(q.title, None);

    let raw = FilterRequest::from(q);
    assert_eq!(raw.len(), 2);
    let filter = build_filter_clause(&raw, &JOB_FILTERS).unwrap();
    assert_eq!(filter.clause, "WHERE salary >= $1 AND equity IS NOT NULL");
}

#[test]
fn test_company_query_into_request() {
    let q = CompanyQuery {
        name: Some("NET".to_string()),
        ..CompanyQuery::default()
    };
    let raw = FilterRequest::from(q);
    assert!(raw.contains_key("name"));
    assert!(!raw.contains_key("minEmployees"));
}

#[test]
fn test_filter_request_deserialize() {
    let raw: FilterRequest =
        serde_json::from_str(r#"{"name": "NET", "minEmployees": 120}"#).unwrap();
    assert_eq!(raw.get("minEmployees"), Some(&FilterValue::Int(120)));
    assert_eq!(raw.get("name"), Some(&FilterValue::from("NET")));
}
