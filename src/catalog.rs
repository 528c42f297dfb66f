//! Built-in example diagrams, organized by category.
//!
//! Examples are addressed by a key derived from their display name
//! (lowercased, whitespace collapsed to underscores), so "Todo App" loads
//! as `todo_app`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Example {
    pub name: &'static str,
    pub source: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub examples: &'static [Example],
}

/// Lookup key for an example display name.
pub fn example_key(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Find an example by key across all categories.
pub fn find(key: &str) -> Option<&'static Example> {
    CATALOG
        .iter()
        .flat_map(|c| c.examples.iter())
        .find(|e| example_key(e.name) == key)
}

/// The example shown on startup: the first entry of the first category.
pub fn default_example() -> &'static Example {
    &CATALOG[0].examples[0]
}

pub static CATALOG: &[Category] = &[
    Category {
        name: "Basic Applications",
        examples: &[
            Example {
                name: "Todo App",
                source: r#"flowchart TD
    A[User Opens App] --> B{Has Account?}
    B -->|No| C[Sign Up]
    B -->|Yes| D[Login]
    C --> E[Create Profile]
    E --> F[Dashboard]
    D --> F
    F --> G[View Tasks]
    G --> H{Action?}
    H -->|Add| I[Create Task]
    H -->|Edit| J[Update Task]
    H -->|Delete| K[Remove Task]
    H -->|Complete| L[Mark Complete]
    I --> G
    J --> G
    K --> G
    L --> G"#,
            },
            Example {
                name: "Chat Application",
                source: r#"sequenceDiagram
    participant U1 as User 1
    participant C as Client App
    participant WS as WebSocket Server
    participant DB as Database
    participant U2 as User 2

    U1->>C: Type message
    C->>WS: Send message via WebSocket
    WS->>DB: Store message
    DB-->>WS: Confirm stored
    WS->>U2: Broadcast message
    U2->>C: Receive message
    C->>U2: Display notification
    U2->>C: Read message
    C->>WS: Mark as read
    WS->>DB: Update read status"#,
            },
        ],
    },
    Category {
        name: "Medium Complexity",
        examples: &[
            Example {
                name: "E-commerce Platform",
                source: r#"erDiagram
    CUSTOMER ||--o{ ORDER : places
    CUSTOMER {
        string customer_id
        string email
        string name
        string address
        datetime created_at
    }
    ORDER ||--|{ ORDER_ITEM : contains
    ORDER {
        string order_id
        string customer_id
        decimal total_amount
        string status
        datetime order_date
    }
    ORDER_ITEM }|--|| PRODUCT : references
    ORDER_ITEM {
        string order_id
        string product_id
        int quantity
        decimal unit_price
    }
    PRODUCT ||--o{ REVIEW : has
    PRODUCT {
        string product_id
        string name
        text description
        decimal price
        int stock_quantity
        string category
    }
    CUSTOMER ||--o{ REVIEW : writes
    REVIEW {
        string review_id
        string customer_id
        string product_id
        int rating
        text comment
        datetime created_at
    }"#,
            },
            Example {
                name: "Learning Management System",
                source: r#"classDiagram
    class User {
        +String userId
        +String email
        +String name
        +DateTime lastLogin
        +login()
        +logout()
        +updateProfile()
    }

    class Student {
        +String studentId
        +enrollInCourse()
        +submitAssignment()
        +takeQuiz()
        +viewGrades()
    }

    class Instructor {
        +String instructorId
        +createCourse()
        +gradeAssignment()
        +publishContent()
        +generateReports()
    }

    class Course {
        +String courseId
        +String title
        +String description
        +DateTime startDate
        +DateTime endDate
        +addStudent()
        +removeStudent()
        +publishLesson()
    }

    class Assignment {
        +String assignmentId
        +String title
        +DateTime dueDate
        +Integer maxPoints
        +create()
        +submit()
        +grade()
    }

    User <|-- Student
    User <|-- Instructor
    Student "many" -- "many" Course : enrolled in
    Instructor "1" -- "many" Course : teaches
    Course "1" -- "many" Assignment : contains"#,
            },
        ],
    },
    Category {
        name: "Workflows & Processes",
        examples: &[
            Example {
                name: "CI/CD Pipeline",
                source: r#"flowchart LR
    A[Developer Push] --> B[GitHub Webhook]
    B --> C[Build Trigger]
    C --> D[Pull Source Code]
    D --> E[Install Dependencies]
    E --> F[Run Unit Tests]
    F --> G{Tests Pass?}
    G -->|No| H[Notify Developer]
    G -->|Yes| I[Build Application]
    I --> J[Security Scan]
    J --> K{Vulnerabilities?}
    K -->|Yes| H
    K -->|No| L[Deploy to Staging]
    L --> M[Integration Tests]
    M --> N{Tests Pass?}
    N -->|No| H
    N -->|Yes| O{Manual Approval?}
    O -->|No| P[Auto Deploy to Prod]
    O -->|Yes| Q[Wait for Approval]
    Q --> R[Deploy to Production]
    P --> S[Health Check]
    R --> S
    S --> T[Success Notification]"#,
            },
            Example {
                name: "User Onboarding",
                source: r#"stateDiagram-v2
    [*] --> LandingPage
    LandingPage --> SignUp : Click Sign Up
    LandingPage --> Login : Click Login

    SignUp --> EmailVerification : Submit Form
    EmailVerification --> ProfileSetup : Verify Email
    EmailVerification --> SignUp : Resend Email

    Login --> Dashboard : Valid Credentials
    Login --> Login : Invalid Credentials

    ProfileSetup --> InterestsSelection : Save Profile
    InterestsSelection --> Tutorial : Select Interests
    Tutorial --> Dashboard : Complete Tutorial
    Tutorial --> Dashboard : Skip Tutorial

    Dashboard --> [*] : User Active

    state ProfileSetup {
        [*] --> BasicInfo
        BasicInfo --> Avatar : Next
        Avatar --> Preferences : Next
        Preferences --> [*] : Save
    }"#,
            },
            Example {
                name: "Order Processing",
                source: r#"sequenceDiagram
    participant C as Customer
    participant UI as Web Interface
    participant API as Order API
    participant INV as Inventory Service
    participant PAY as Payment Service
    participant SHP as Shipping Service
    participant EMAIL as Email Service

    C->>UI: Add items to cart
    C->>UI: Proceed to checkout
    UI->>API: Create order request
    API->>INV: Check inventory
    INV-->>API: Confirm availability
    API->>PAY: Process payment
    PAY-->>API: Payment confirmed
    API->>SHP: Create shipping label
    SHP-->>API: Tracking number
    API->>EMAIL: Send confirmation
    EMAIL-->>C: Order confirmation email
    API-->>UI: Order success
    UI-->>C: Display confirmation

    Note over SHP: Package ships
    SHP->>EMAIL: Shipping notification
    EMAIL-->>C: Tracking email"#,
            },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_slugged_names() {
        assert_eq!(example_key("Todo App"), "todo_app");
        assert_eq!(example_key("CI/CD Pipeline"), "ci/cd_pipeline");
        assert_eq!(example_key("E-commerce Platform"), "e-commerce_platform");
    }

    #[test]
    fn every_example_is_findable_by_key() {
        for category in CATALOG {
            for example in category.examples {
                let found = find(&example_key(example.name))
                    .unwrap_or_else(|| panic!("missing {}", example.name));
                assert_eq!(found.name, example.name);
            }
        }
    }

    #[test]
    fn unknown_keys_find_nothing() {
        assert!(find("weather_dashboard").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn default_is_the_first_entry() {
        assert_eq!(default_example().name, "Todo App");
    }

    #[test]
    fn every_example_renders() {
        let colors = crate::render::DiagramColors::default();
        for category in CATALOG {
            for example in category.examples {
                let rendered =
                    crate::render::render(example.source, &colors, "Inter", false)
                        .unwrap_or_else(|e| panic!("{} failed: {}", example.name, e));
                assert!(rendered.width > 0.0 && rendered.height > 0.0);
            }
        }
    }
}
