use serde_json::{json, Value};

/// Current record in the sectioned shape
#[allow(dead_code)]
pub fn sectioned_current() -> Value {
    json!({
        "personal_info": {
            "first_name": "Rahim",
            "last_name": "Uddin",
            "phone": "01711111111",
            "dob": "1988-02-10",
            "religion": "Islam"
        },
        "family": {
            "father": {"id": 11, "relation": "father", "name": "Karim Uddin", "is_alive": true},
            "mother": {"id": 12, "relation": "mother", "name": "Amina Begum"},
            "spouses": [{"id": 13, "relation": "spouse", "name": "Nadia", "is_active_marriage": true}],
            "children": [{"id": 14, "relation": "child", "name": "Sara", "dob": "2015-01-09"}]
        },
        "addresses": {
            "present": {"division": "Dhaka", "district": "Dhaka", "upazila": "Mirpur"},
            "permanent": {"division": "Rajshahi", "district": "Bogura"}
        },
        "academics": [
            {"exam_name": "SSC", "institute": "Bogura Zilla School", "passing_year": 2004, "result": "5.00"}
        ]
    })
}

/// The same record in the flat employee shape
#[allow(dead_code)]
pub fn employee_current() -> Value {
    json!({
        "id": 7,
        "employee_code": "BR-00042",
        "first_name": "Rahim",
        "last_name": "Uddin",
        "phone": "01711111111",
        "dob": "1988-02-10T00:00:00.000Z",
        "religion": "Islam",
        "family": [
            {"id": 11, "relation": "father", "name": "Karim Uddin", "is_alive": true},
            {"id": 12, "relation": "mother", "name": "Amina Begum"},
            {"id": 13, "relation": "spouse", "name": "Nadia", "is_active_marriage": true},
            {"id": 14, "relation": "child", "name": "Sara", "dob": "2015-01-09"}
        ],
        "addresses": [
            {"id": 21, "type": "present", "division": "Dhaka", "district": "Dhaka", "upazila": "Mirpur"},
            {"id": 22, "type": "permanent", "division": "Rajshahi", "district": "Bogura"}
        ],
        "academics": [
            {"id": 31, "exam_name": "SSC", "institute": "Bogura Zilla School", "passing_year": 2004, "result": "5.00"}
        ]
    })
}
