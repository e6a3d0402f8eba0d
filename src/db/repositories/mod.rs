mod saved_items;
