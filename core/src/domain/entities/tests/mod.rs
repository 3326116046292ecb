mod answer_tests;
mod audit_tests;
mod question_tests;
