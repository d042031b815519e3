mod history_builder_tests;
