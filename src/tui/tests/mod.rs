mod ui_tests;
