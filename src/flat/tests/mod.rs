mod collection_tests;
